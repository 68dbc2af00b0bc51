//! Utilities for running commands with proper error handling

use std::collections::HashMap;
use std::process::{Command, Output, Stdio};

use tracing::{debug, error};

use crate::error::SetupError;

/// Run a command, capturing stdout and stderr.
///
/// Entries in `envs` are added to the child's environment block directly,
/// never interpolated through a shell, so values need no escaping.
pub fn run_command(
    program: &str,
    args: &[&str],
    envs: Option<&HashMap<String, String>>,
) -> Result<Output, SetupError> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    if let Some(envs) = envs {
        cmd.envs(envs);
    }

    debug!("Running command: {} {}", program, args.join(" "));

    let output = cmd.output().map_err(|source| SetupError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        error!("Command failed: {} {}", program, args.join(" "));
        error!("Stderr: {}", stderr);
        return Err(SetupError::CommandFailed {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.is_empty() {
        debug!("Command output: {}", stdout);
    }

    Ok(output)
}

/// Run a command and return stdout as string
pub fn run_command_stdout(
    program: &str,
    args: &[&str],
    envs: Option<&HashMap<String, String>>,
) -> Result<String, SetupError> {
    let output = run_command(program, args, envs)?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
