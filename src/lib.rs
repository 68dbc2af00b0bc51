//! Compose Harness Library
//!
//! Thin helpers for integration-test setups: bring a Docker Compose
//! environment up and down, resolve and stop its services, read
//! variables from inside running containers, and probe whether the
//! databases and ports behind it are ready.
//!
//! Orchestration failures are fatal [`SetupError`]s meant to abort test
//! bootstrap; the three probes return recoverable outcomes meant to be
//! polled:
//!
//! ```rust,no_run
//! use compose_harness::{compose, probes};
//!
//! # fn main() -> Result<(), compose_harness::SetupError> {
//! let _env = compose::ComposeGuard::up("tests/fixtures/docker-compose.yml")?;
//! while !probes::probe_port("127.0.0.1", 5432) {
//!     std::thread::sleep(std::time::Duration::from_millis(200));
//! }
//! // ... run the test; the environment is torn down when the guard drops.
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod compose;
pub mod error;
pub mod executor;
pub mod logging;
pub mod probes;

// Re-export commonly used types
pub use compose::{ComposeGuard, Orchestrator};
pub use error::{ProbeError, SetupError};
pub use executor::{CommandExecutor, RealExecutor};
pub use logging::init_logging;
pub use probes::{probe_database, probe_document_database, probe_port, DatabaseKind};
