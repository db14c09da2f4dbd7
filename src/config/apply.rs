use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, ProfileArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::sample::FrameBudget;

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line win over the config file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut ProfileArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "serial")
        && let Some(serial) = config.serial.clone()
    {
        args.serial = Some(serial);
    }

    if !is_cli(matches, "package")
        && let Some(package) = config.package.clone()
    {
        args.package = Some(package);
    }

    if !is_cli(matches, "label")
        && let Some(label) = config.label.clone()
    {
        args.label = Some(label);
    }

    if !is_cli(matches, "trials")
        && let Some(trials) = config.trials
    {
        args.trials = PositiveUsize::try_from(trials).map_err(|err| invalid("trials", err))?;
    }

    if !is_cli(matches, "hold")
        && let Some(hold) = config.hold.as_ref()
    {
        args.hold = to_duration(hold, "hold")?;
    }

    if !is_cli(matches, "kinds")
        && let Some(kinds) = config.kinds.as_ref()
    {
        if kinds.is_empty() {
            return Err(invalid("kinds", ValidationError::NoProfilingKinds));
        }
        args.kinds.clone_from(kinds);
    }

    if !is_cli(matches, "api_level")
        && let Some(level) = config.api_level
    {
        args.api_level = Some(level);
    }

    if !is_cli(matches, "adb_path")
        && let Some(path) = config.adb_path.clone()
    {
        args.adb_path = path;
    }

    if !is_cli(matches, "command_timeout")
        && let Some(timeout) = config.command_timeout.as_ref()
    {
        args.command_timeout = to_duration(timeout, "command_timeout")?;
    }

    if !is_cli(matches, "poll_interval")
        && let Some(interval) = config.poll_interval.as_ref()
    {
        args.poll_interval = to_duration(interval, "poll_interval")?;
    }

    if !is_cli(matches, "no_dedup")
        && let Some(dedup) = config.dedup_polls
    {
        args.no_dedup = !dedup;
    }

    if !is_cli(matches, "frame_budget")
        && let Some(ms) = config.frame_budget_ms
    {
        args.frame_budget = FrameBudget::new(ms).map_err(|err| invalid("frame_budget_ms", err))?;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if let Some(report) = config.report.as_ref() {
        if !is_cli(matches, "json_dir")
            && let Some(dir) = report.json_dir.clone()
        {
            args.json_dir = Some(dir);
        }
        if !is_cli(matches, "sqlite_path")
            && let Some(path) = report.sqlite_path.clone()
        {
            args.sqlite_path = Some(path);
        }
        if !is_cli(matches, "first_row")
            && let Some(row) = report.first_row
        {
            args.first_row =
                Some(PositiveU64::try_from(row).map_err(|err| invalid("report.first_row", err))?);
        }
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| invalid(field, err))
}

fn invalid(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}
