//! Configuration loading and application.
pub(crate) mod apply;
mod loader;
mod parse;
pub mod types;

#[cfg(test)]
mod test_support;

pub use apply::apply_config;
pub use loader::{CONFIG_JSON_NAME, CONFIG_TOML_NAME, load_config};

pub(crate) use parse::parse_duration_value;
