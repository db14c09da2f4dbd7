use thiserror::Error;

use super::{
    CollectorError, ConfigError, ParseError, ShellError, SinkError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn parse<E>(error: E) -> Self
    where
        E: Into<ParseError>,
    {
        error.into().into()
    }

    pub fn shell<E>(error: E) -> Self
    where
        E: Into<ShellError>,
    {
        error.into().into()
    }

    pub fn collector<E>(error: E) -> Self
    where
        E: Into<CollectorError>,
    {
        error.into().into()
    }

    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn sink<E>(error: E) -> Self
    where
        E: Into<SinkError>,
    {
        error.into().into()
    }

    /// Returns true when the failure came from reading a diagnostic dump.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, AppError::Parse(_))
    }
}
