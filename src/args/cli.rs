use clap::Parser;
use std::time::Duration;

use crate::collector::{CollectorSettings, ProfilingKind};
use crate::error::{AppError, AppResult, ValidationError};
use crate::sample::FrameBudget;
use crate::shell::DEFAULT_ADB_PATH;
use crate::sinks::ReportConfig;

use super::parsers::{
    parse_duration_arg, parse_frame_budget, parse_positive_u64, parse_positive_usize,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Profiles Android rendering jank and input latency over adb and reduces repeated trials into trimmed summary statistics."
)]
pub struct ProfileArgs {
    /// Device serial passed to `adb -s` (defaults to the only attached device)
    #[arg(long, short = 's', env = "ANDROID_SERIAL")]
    pub serial: Option<String>,

    /// Package under test
    #[arg(long, short = 'p')]
    pub package: Option<String>,

    /// Run label used in reports (defaults to the package name)
    #[arg(long, short = 'l')]
    pub label: Option<String>,

    /// Number of trials to run
    #[arg(long, short = 't', default_value = "10", value_parser = parse_positive_usize)]
    pub trials: PositiveUsize,

    /// How long each trial stays open while the action under test runs (supports ms/s/m/h)
    #[arg(long, default_value = "5s", value_parser = parse_duration_arg)]
    pub hold: Duration,

    /// Profiling kinds to collect (comma separated)
    #[arg(
        long = "kind",
        short = 'k',
        value_enum,
        value_delimiter = ',',
        default_values_t = [ProfilingKind::Gfx]
    )]
    pub kinds: Vec<ProfilingKind>,

    /// Use this API level instead of querying the device
    #[arg(long = "api-level")]
    pub api_level: Option<u64>,

    /// Path to the adb executable
    #[arg(long = "adb-path", default_value = DEFAULT_ADB_PATH)]
    pub adb_path: String,

    /// Timeout for each device command (supports ms/s/m/h)
    #[arg(long = "command-timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub command_timeout: Duration,

    /// Interval between profile dumps on devices without aggregated reports (supports ms/s/m/h)
    #[arg(long = "poll-interval", default_value = "1s", value_parser = parse_duration_arg)]
    pub poll_interval: Duration,

    /// Count every polled frame row, even rows repeated from the previous poll
    #[arg(long = "no-dedup")]
    pub no_dedup: bool,

    /// Frame duration above which a frame counts as janky, in milliseconds
    #[arg(long = "frame-budget-ms", default_value = "16.666", value_parser = parse_frame_budget)]
    pub frame_budget: FrameBudget,

    /// Directory for JSON reports (`<label>.json` plus `summary.jsonl`)
    #[arg(long = "json-dir")]
    pub json_dir: Option<String>,

    /// SQLite database for reports
    #[arg(long = "sqlite-path")]
    pub sqlite_path: Option<String>,

    /// Summary row used when the report destination holds no earlier runs
    #[arg(long = "first-row", value_parser = parse_positive_u64)]
    pub first_row: Option<PositiveU64>,

    /// Enable verbose logging (sets log level to debug unless overridden by FRAMESCOPE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./framescope.toml or ./framescope.json if present.
    #[arg(long)]
    pub config: Option<String>,
}

impl ProfileArgs {
    /// Package under test.
    ///
    /// # Errors
    ///
    /// Returns an error when neither the CLI nor the config names a package.
    pub fn package(&self) -> AppResult<&str> {
        self.package
            .as_deref()
            .map(str::trim)
            .filter(|package| !package.is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingPackage))
    }

    /// Run label, falling back to the package name.
    ///
    /// # Errors
    ///
    /// Returns an error when no package is configured.
    pub fn label(&self) -> AppResult<&str> {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => Ok(label),
            Some(_) | None => self.package(),
        }
    }

    /// Device target passed to the command runner; empty selects the only
    /// attached device.
    #[must_use]
    pub fn target(&self) -> &str {
        self.serial.as_deref().unwrap_or_default()
    }

    /// Collector configuration for the package under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no package is configured.
    pub fn collector_settings(&self) -> AppResult<CollectorSettings> {
        let mut settings = CollectorSettings::new(self.package()?);
        settings.frame_budget = self.frame_budget;
        settings.poll_interval = self.poll_interval;
        settings.dedup_polls = !self.no_dedup;
        Ok(settings)
    }

    #[must_use]
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            json_dir: self.json_dir.clone(),
            sqlite_path: self.sqlite_path.clone(),
            first_row: self.first_row.map(PositiveU64::get),
        }
    }

    /// Distinct requested kinds in collection order.
    ///
    /// # Errors
    ///
    /// Returns an error when no kind is requested.
    pub fn kinds(&self) -> AppResult<Vec<ProfilingKind>> {
        let mut kinds = self.kinds.clone();
        kinds.sort();
        kinds.dedup();
        if kinds.is_empty() {
            return Err(AppError::validation(ValidationError::NoProfilingKinds));
        }
        Ok(kinds)
    }
}
