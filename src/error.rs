//! Error types split by severity.
//!
//! Orchestration failures are setup failures a test run cannot recover
//! from; callers are expected to propagate them straight out of test
//! bootstrap. Probe failures are expected while waiting for a service to
//! come up and are meant to be polled.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::probes::DatabaseKind;

/// Unrecoverable failure while driving the container CLI.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The orchestrator executable could not be launched at all.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The orchestrator ran but exited non-zero.
    #[error("{program} exited with code {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Compose file paths are passed as subprocess arguments and must be
    /// valid UTF-8.
    #[error("compose file path is not valid UTF-8: {path:?}")]
    InvalidPath { path: PathBuf },
}

/// Recoverable readiness-probe failure, intended to be polled until a
/// service comes up.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("database probe failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("document database probe failed: {0}")]
    Document(#[from] mongodb::error::Error),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// The connection string's scheme does not belong to the requested
    /// driver, so connecting would probe the wrong thing.
    #[error("connection string {url:?} does not match driver {kind}")]
    DriverMismatch { kind: DatabaseKind, url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display_includes_stderr() {
        let err = SetupError::CommandFailed {
            program: "docker".to_string(),
            code: Some(125),
            stderr: "no such file or directory".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("docker"));
        assert!(msg.contains("125"));
        assert!(msg.contains("no such file or directory"));
    }

    #[test]
    fn test_driver_mismatch_display() {
        let err = ProbeError::DriverMismatch {
            kind: DatabaseKind::Postgres,
            url: "mysql://localhost/db".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("postgres"));
        assert!(msg.contains("mysql://localhost/db"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ProbeError::Timeout(Duration::from_secs(9));
        assert!(err.to_string().contains("9s"));
    }
}
