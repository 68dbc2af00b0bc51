//! Command execution abstraction for testability
//!
//! This module provides a trait-based abstraction over the orchestrator
//! CLI invocations, enabling dependency injection and mocking for tests.

use std::collections::HashMap;
use std::process::Output;

use crate::error::SetupError;

/// Abstraction for command execution, enabling mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Run a command with an optional injected environment map
    fn run_command(
        &self,
        program: &str,
        args: &[&str],
        envs: Option<&HashMap<String, String>>,
    ) -> Result<Output, SetupError>;

    /// Run a command and return stdout as string
    fn run_command_stdout(
        &self,
        program: &str,
        args: &[&str],
        envs: Option<&HashMap<String, String>>,
    ) -> Result<String, SetupError>;
}

/// Default implementation using real subprocess calls
#[derive(Debug, Clone, Default)]
pub struct RealExecutor;

impl RealExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for RealExecutor {
    fn run_command(
        &self,
        program: &str,
        args: &[&str],
        envs: Option<&HashMap<String, String>>,
    ) -> Result<Output, SetupError> {
        crate::command::run_command(program, args, envs)
    }

    fn run_command_stdout(
        &self,
        program: &str,
        args: &[&str],
        envs: Option<&HashMap<String, String>>,
    ) -> Result<String, SetupError> {
        crate::command::run_command_stdout(program, args, envs)
    }
}

/// A mock executor for testing that records calls and returns configured
/// responses, without touching the Docker daemon.
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Recorded command invocation
    #[derive(Clone, Debug)]
    pub struct CommandCall {
        pub program: String,
        pub args: Vec<String>,
        pub envs: Option<HashMap<String, String>>,
    }

    /// Response configuration for mock
    #[derive(Clone, Debug)]
    pub enum MockResponse {
        Success { stdout: String },
        Failure { exit_code: i32, stderr: String },
    }

    impl Default for MockResponse {
        fn default() -> Self {
            MockResponse::Success {
                stdout: String::new(),
            }
        }
    }

    /// Mock executor for testing
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        /// Recorded command invocations
        pub calls: Arc<Mutex<Vec<CommandCall>>>,
        /// Responses handed out in order; falls back to the default
        /// response once exhausted
        responses: Arc<Mutex<Vec<MockResponse>>>,
        default_response: Arc<Mutex<MockResponse>>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for the next unanswered invocation
        pub fn expect(self, response: MockResponse) -> Self {
            self.responses.lock().unwrap().push(response);
            self
        }

        /// Set the default response once queued responses are exhausted
        pub fn with_default_response(self, response: MockResponse) -> Self {
            *self.default_response.lock().unwrap() = response;
            self
        }

        /// Get all recorded calls
        pub fn get_calls(&self) -> Vec<CommandCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Get number of recorded calls
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn record_call(&self, program: &str, args: &[&str], envs: Option<&HashMap<String, String>>) {
            self.calls.lock().unwrap().push(CommandCall {
                program: program.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
                envs: envs.cloned(),
            });
        }

        fn next_response(&self) -> MockResponse {
            let mut queued = self.responses.lock().unwrap();
            if queued.is_empty() {
                self.default_response.lock().unwrap().clone()
            } else {
                queued.remove(0)
            }
        }

        fn execute_response(&self, program: &str, response: MockResponse) -> Result<Output, SetupError> {
            match response {
                MockResponse::Success { stdout } => Ok(Output {
                    status: std::process::ExitStatus::default(),
                    stdout: stdout.into_bytes(),
                    stderr: Vec::new(),
                }),
                MockResponse::Failure { exit_code, stderr } => Err(SetupError::CommandFailed {
                    program: program.to_string(),
                    code: Some(exit_code),
                    stderr,
                }),
            }
        }
    }

    impl CommandExecutor for MockExecutor {
        fn run_command(
            &self,
            program: &str,
            args: &[&str],
            envs: Option<&HashMap<String, String>>,
        ) -> Result<Output, SetupError> {
            self.record_call(program, args, envs);
            let response = self.next_response();
            self.execute_response(program, response)
        }

        fn run_command_stdout(
            &self,
            program: &str,
            args: &[&str],
            envs: Option<&HashMap<String, String>>,
        ) -> Result<String, SetupError> {
            let output = self.run_command(program, args, envs)?;
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_executor_creation() {
        let executor = RealExecutor::new();
        // Just verify it can be created
        let _ = executor;
    }

    #[test]
    fn test_mock_executor_records_calls() {
        use mock::*;

        let executor = MockExecutor::new();

        let _ = executor.run_command("docker", &["compose", "ps"], None);

        assert_eq!(executor.call_count(), 1);
        let calls = executor.get_calls();
        assert_eq!(calls[0].program, "docker");
        assert_eq!(calls[0].args, vec!["compose", "ps"]);
        assert!(calls[0].envs.is_none());
    }

    #[test]
    fn test_mock_executor_records_envs() {
        use mock::*;

        let mut envs = HashMap::new();
        envs.insert("TEST".to_string(), "testing".to_string());

        let executor = MockExecutor::new();
        let _ = executor.run_command("docker", &[], Some(&envs));

        let calls = executor.get_calls();
        let recorded = calls[0].envs.as_ref().unwrap();
        assert_eq!(recorded.get("TEST").map(String::as_str), Some("testing"));
    }

    #[test]
    fn test_mock_executor_queued_then_default_response() {
        use mock::*;

        let executor = MockExecutor::new()
            .expect(MockResponse::Success {
                stdout: "first".to_string(),
            })
            .with_default_response(MockResponse::Success {
                stdout: "later".to_string(),
            });

        assert_eq!(executor.run_command_stdout("x", &[], None).unwrap(), "first");
        assert_eq!(executor.run_command_stdout("x", &[], None).unwrap(), "later");
        assert_eq!(executor.run_command_stdout("x", &[], None).unwrap(), "later");
    }

    #[test]
    fn test_mock_executor_failure_response() {
        use mock::*;

        let executor = MockExecutor::new().expect(MockResponse::Failure {
            exit_code: 1,
            stderr: "no such service".to_string(),
        });

        let result = executor.run_command("docker", &[], None);
        match result {
            Err(SetupError::CommandFailed { code, stderr, .. }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "no such service");
            }
            other => panic!("expected CommandFailed, got {:?}", other.map(|_| ())),
        }
    }
}
