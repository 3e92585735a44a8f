//! External command execution

use crate::core::WorkflowError;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Raw output of one command run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(0),
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one external command to completion
///
/// Implementations never fail because of a non-zero exit status; deciding
/// whether the output is a failure is left to the caller. An `Err` means the
/// command could not be run at all.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput, WorkflowError>;
}

/// Executes command lines through the system shell
#[derive(Debug, Clone)]
pub struct ShellCommandExecutor {
    shell: String,
}

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    /// Use a different POSIX shell
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn run(&self, command: &str, cwd: Option<&Path>) -> Result<CommandOutput, WorkflowError> {
        debug!("Spawning `{}` via {}", command, self.shell);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command).kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|e| WorkflowError::Spawn {
            command: command.to_string(),
            source: e,
        })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        debug!(
            "`{}` exited with {:?} ({} bytes stdout, {} bytes stderr)",
            command,
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );

        Ok(result)
    }
}
