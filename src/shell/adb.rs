use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{AppError, AppResult, ShellError};

use super::{CommandOutput, CommandRunner};

pub const DEFAULT_ADB_PATH: &str = "adb";

/// Runs commands through `adb [-s <serial>] shell`.
#[derive(Debug, Clone)]
pub struct AdbRunner {
    adb_path: String,
    timeout: Duration,
}

impl AdbRunner {
    #[must_use]
    pub fn new(adb_path: Option<String>, timeout: Duration) -> Self {
        Self {
            adb_path: adb_path.unwrap_or_else(|| DEFAULT_ADB_PATH.to_owned()),
            timeout,
        }
    }

    fn command(&self, command: &str, target: &str) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        if !target.is_empty() {
            cmd.arg("-s").arg(target);
        }
        cmd.arg("shell")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for AdbRunner {
    async fn run(&self, command: &str, target: &str) -> AppResult<CommandOutput> {
        tracing::trace!(command, target, "Running device command");
        let mut cmd = self.command(command, target);
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_elapsed| {
                AppError::shell(ShellError::Timeout {
                    command: command.to_owned(),
                    timeout: self.timeout,
                })
            })?
            .map_err(|err| {
                AppError::shell(ShellError::Spawn {
                    program: self.adb_path.clone(),
                    source: err,
                })
            })?;

        let status = output.status.code().unwrap_or(-1);
        if !output.status.success() {
            return Err(AppError::shell(ShellError::NonZeroExit {
                command: command.to_owned(),
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            }));
        }
        let stdout = String::from_utf8(output.stdout).map_err(|err| {
            AppError::shell(ShellError::Utf8 {
                command: command.to_owned(),
                source: err,
            })
        })?;
        Ok(CommandOutput { status, stdout })
    }
}
