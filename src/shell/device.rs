use crate::error::AppResult;
use crate::extract::parse_u64;

use super::commands::{PROP_API_LEVEL, PROP_PRODUCT_MODEL, getprop};
use super::CommandRunner;

/// Reads the platform API level of `target`.
///
/// # Errors
///
/// Returns an error when the property cannot be read or is not a number.
pub async fn query_api_level(runner: &dyn CommandRunner, target: &str) -> AppResult<u64> {
    let output = runner.run(&getprop(PROP_API_LEVEL), target).await?;
    parse_u64("api_level", output.stdout.trim())
}

/// Reads the product model of `target`, e.g. for report headers.
///
/// # Errors
///
/// Returns an error when the property cannot be read.
pub async fn query_product_model(runner: &dyn CommandRunner, target: &str) -> AppResult<String> {
    let output = runner.run(&getprop(PROP_PRODUCT_MODEL), target).await?;
    Ok(output.stdout.trim().to_owned())
}
