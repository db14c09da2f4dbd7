//! Shell command execution against a target device.
mod adb;
mod commands;
mod device;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use crate::error::AppResult;

pub use adb::{AdbRunner, DEFAULT_ADB_PATH};
pub use commands::{
    ATRACE_START, ATRACE_STOP, PROP_API_LEVEL, PROP_PRODUCT_MODEL, gfxinfo_dump, gfxinfo_reset,
    getprop,
};
pub use device::{query_api_level, query_product_model};

/// Exit status and captured standard output of one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
}

/// Runs diagnostic commands on a device identified by `target`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Executes `command` in the target's shell.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be run or does not complete.
    async fn run(&self, command: &str, target: &str) -> AppResult<CommandOutput>;
}
