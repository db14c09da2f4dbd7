mod app;
mod collector;
mod config;
mod parse;
mod shell;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use collector::CollectorError;
pub use config::ConfigError;
pub use parse::ParseError;
pub use shell::ShellError;
pub use sink::SinkError;
pub use validation::ValidationError;
