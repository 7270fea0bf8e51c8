//! External process execution
//!
//! Every build and bench step is a shell command string run in the
//! working directory. Success is exit code zero; stdout and stderr are
//! captured so they can be surfaced when a step fails.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{AppError, AppResult};

/// Output captured from a command run.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Turn a failed run into a `CommandFailed` error.
    pub fn into_error(self, command: &str) -> AppError {
        AppError::CommandFailed {
            command: command.to_string(),
            exit_code: self.exit_code,
            stdout: self.stdout,
            stderr: self.stderr,
        }
    }
}

/// Something that can run a shell command line to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Shell: Send + Sync {
    async fn run(&self, command: &str, cwd: &Path) -> AppResult<CommandOutput>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

#[async_trait]
impl Shell for SystemShell {
    async fn run(&self, command: &str, cwd: &Path) -> AppResult<CommandOutput> {
        tracing::debug!(command = %command, cwd = %cwd.display(), "Running command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| AppError::Spawn {
                command: command.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
