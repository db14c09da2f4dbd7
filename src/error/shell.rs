use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' timed out after {}ms.", timeout.as_millis())]
    Timeout { command: String, timeout: Duration },
    #[error("Command '{command}' exited with status {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("Command '{command}' produced non UTF-8 output: {source}")]
    Utf8 {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
