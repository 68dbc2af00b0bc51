//! Docker Compose environment control for integration tests
//!
//! Every operation is a single, blocking invocation of the `docker`
//! CLI: bring a declared set of services up or down, resolve the
//! container id of a running service, stop one service, and read an
//! environment variable from inside a running container. Nothing here
//! parses the compose file; it is owned by the caller and must stay on
//! disk for the duration of each call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::SetupError;
use crate::executor::{CommandExecutor, RealExecutor};

/// Drives the `docker` CLI through a pluggable executor.
///
/// Production code uses [`Orchestrator::new`]; tests inject a
/// [`mock::MockExecutor`](crate::executor::mock::MockExecutor).
pub struct Orchestrator<E = RealExecutor> {
    executor: E,
}

impl Orchestrator<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new(),
        }
    }
}

impl Default for Orchestrator<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> Orchestrator<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Start every service declared in the compose file, detached.
    pub fn up(&self, compose_file: &Path) -> Result<(), SetupError> {
        let file = path_arg(compose_file)?;
        info!("Starting environment from {}", file);
        self.executor
            .run_command("docker", &["compose", "-f", file, "up", "-d"], None)?;
        Ok(())
    }

    /// Start the environment with `envs` injected into the orchestrator's
    /// environment block, so variables interpolated in the compose file
    /// resolve to the supplied values.
    ///
    /// The mapping goes directly into the child process environment and is
    /// never passed through a shell, so values need no escaping.
    pub fn up_with_env(
        &self,
        compose_file: &Path,
        envs: &HashMap<String, String>,
    ) -> Result<(), SetupError> {
        let file = path_arg(compose_file)?;
        info!("Starting environment from {} with {} injected variable(s)", file, envs.len());
        self.executor
            .run_command("docker", &["compose", "-f", file, "up", "-d"], Some(envs))?;
        Ok(())
    }

    /// Tear the environment down, removing the containers and networks it
    /// created. Service ids resolved before this call are dead afterwards.
    pub fn down(&self, compose_file: &Path) -> Result<(), SetupError> {
        let file = path_arg(compose_file)?;
        info!("Tearing down environment from {}", file);
        self.executor
            .run_command("docker", &["compose", "-f", file, "down"], None)?;
        Ok(())
    }

    /// Resolve the container id of a running service.
    ///
    /// Returns the empty string when the CLI succeeds but reports no
    /// container, i.e. the service is not running.
    pub fn service_id(&self, compose_file: &Path, service: &str) -> Result<String, SetupError> {
        let file = path_arg(compose_file)?;
        let out = self.executor.run_command_stdout(
            "docker",
            &["compose", "-f", file, "ps", "-q", service],
            None,
        )?;
        Ok(trim_newline(&out).to_string())
    }

    /// Stop (but do not remove) one running service instance.
    pub fn stop_service(&self, service_id: &str) -> Result<(), SetupError> {
        info!("Stopping service {}", service_id);
        self.executor
            .run_command("docker", &["stop", service_id], None)?;
        Ok(())
    }

    /// Read an environment variable from inside a running container.
    ///
    /// Returns the empty string when the variable is unset: `printenv`
    /// exits 1 without writing to stderr in that case, which is how we
    /// tell it apart from a container that cannot be reached.
    pub fn container_env(&self, service_id: &str, name: &str) -> Result<String, SetupError> {
        let result = self.executor.run_command_stdout(
            "docker",
            &["exec", service_id, "printenv", name],
            None,
        );

        match result {
            Ok(out) => Ok(trim_newline(&out).to_string()),
            Err(SetupError::CommandFailed {
                code: Some(1),
                ref stderr,
                ..
            }) if stderr.trim().is_empty() => Ok(String::new()),
            Err(err) => Err(err),
        }
    }
}

/// Start every service declared in `compose_file`, detached.
pub fn up(compose_file: &Path) -> Result<(), SetupError> {
    Orchestrator::new().up(compose_file)
}

/// Start the environment with caller-supplied variables injected into the
/// orchestrator's environment block.
pub fn up_with_env(compose_file: &Path, envs: &HashMap<String, String>) -> Result<(), SetupError> {
    Orchestrator::new().up_with_env(compose_file, envs)
}

/// Tear the whole environment down.
pub fn down(compose_file: &Path) -> Result<(), SetupError> {
    Orchestrator::new().down(compose_file)
}

/// Resolve the container id of a running service; empty string when the
/// service is not running.
pub fn service_id(compose_file: &Path, service: &str) -> Result<String, SetupError> {
    Orchestrator::new().service_id(compose_file, service)
}

/// Stop (but do not remove) one running service instance.
pub fn stop_service(service_id: &str) -> Result<(), SetupError> {
    Orchestrator::new().stop_service(service_id)
}

/// Read an environment variable from inside a running container; empty
/// string when the variable is unset.
pub fn container_env(service_id: &str, name: &str) -> Result<String, SetupError> {
    Orchestrator::new().container_env(service_id, name)
}

/// Brings an environment up on creation and tears it down on drop.
///
/// Convenient for tests that want teardown to run even when an assertion
/// fails partway through. Teardown errors on drop are logged, not
/// propagated.
pub struct ComposeGuard {
    compose_file: PathBuf,
    orchestrator: Orchestrator<RealExecutor>,
}

impl ComposeGuard {
    /// Bring the environment up and return a guard that downs it on drop.
    pub fn up(compose_file: impl Into<PathBuf>) -> Result<Self, SetupError> {
        let compose_file = compose_file.into();
        let orchestrator = Orchestrator::new();
        orchestrator.up(&compose_file)?;
        Ok(Self {
            compose_file,
            orchestrator,
        })
    }

    /// Like [`ComposeGuard::up`], with caller-supplied variables injected.
    pub fn up_with_env(
        compose_file: impl Into<PathBuf>,
        envs: &HashMap<String, String>,
    ) -> Result<Self, SetupError> {
        let compose_file = compose_file.into();
        let orchestrator = Orchestrator::new();
        orchestrator.up_with_env(&compose_file, envs)?;
        Ok(Self {
            compose_file,
            orchestrator,
        })
    }

    pub fn compose_file(&self) -> &Path {
        &self.compose_file
    }

    /// Resolve the container id of a running service in this environment.
    pub fn service_id(&self, service: &str) -> Result<String, SetupError> {
        self.orchestrator.service_id(&self.compose_file, service)
    }

    /// Stop one service in this environment without removing it.
    pub fn stop_service(&self, service_id: &str) -> Result<(), SetupError> {
        self.orchestrator.stop_service(service_id)
    }

    /// Read an environment variable from inside a running container.
    pub fn container_env(&self, service_id: &str, name: &str) -> Result<String, SetupError> {
        self.orchestrator.container_env(service_id, name)
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        if let Err(err) = self.orchestrator.down(&self.compose_file) {
            warn!(
                "Failed to tear down environment {}: {}",
                self.compose_file.display(),
                err
            );
        }
    }
}

fn path_arg(path: &Path) -> Result<&str, SetupError> {
    path.to_str().ok_or_else(|| SetupError::InvalidPath {
        path: path.to_path_buf(),
    })
}

/// Strip one trailing newline (`\n` or `\r\n`), mirroring what the CLI
/// appends to single-value output.
fn trim_newline(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}
