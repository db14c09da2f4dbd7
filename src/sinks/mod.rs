//! Report sinks persisting aggregated metrics and per-trial records.
mod config;
mod format;
mod json;
mod sqlite;


use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::metrics::Metrics;

pub use config::{DEFAULT_FIRST_ROW, ReportConfig};
pub use format::{GfxTrialRow, ResponseTrialRow, SummaryRow};
pub use json::{JsonReportSink, SUMMARY_FILE_NAME};
pub use sqlite::SqliteReportSink;

/// Row number of a run in the cross-run summary.
///
/// Owned by the caller for the lifetime of one report destination; sinks only
/// read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunIndex(u64);

impl RunIndex {
    #[must_use]
    pub const fn starting_at(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Index of the following run.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for RunIndex {
    fn default() -> Self {
        Self(DEFAULT_FIRST_ROW)
    }
}

/// Identifies one profiling run in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub label: String,
    pub package: String,
    pub device_model: String,
    pub recorded_at: DateTime<Utc>,
}

impl ReportContext {
    #[must_use]
    pub fn new(label: &str, package: &str, device_model: &str) -> Self {
        Self {
            label: label.to_owned(),
            package: package.to_owned(),
            device_model: device_model.to_owned(),
            recorded_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Index following the highest run already stored, or `first` when the
    /// destination holds no runs.
    ///
    /// # Errors
    ///
    /// Returns an error when stored runs cannot be read.
    async fn next_run_index(&self, first: u64) -> AppResult<RunIndex>;

    /// Persists `metrics` of one run as row `run` of the summary.
    ///
    /// # Errors
    ///
    /// Returns an error when the report cannot be serialized or written.
    async fn write_report(
        &self,
        context: &ReportContext,
        run: RunIndex,
        metrics: &Metrics,
    ) -> AppResult<()>;
}

/// Opens every sink enabled in `config`.
///
/// # Errors
///
/// Returns an error when the SQLite database cannot be opened.
pub async fn open_sinks(config: &ReportConfig) -> AppResult<Vec<Box<dyn ReportSink>>> {
    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if let Some(dir) = config.json_dir.as_deref() {
        sinks.push(Box::new(JsonReportSink::new(dir)));
    }
    if let Some(path) = config.sqlite_path.as_deref() {
        sinks.push(Box::new(SqliteReportSink::open(path).await?));
    }
    Ok(sinks)
}

/// Row for the next run: past every run stored by any sink.
///
/// # Errors
///
/// Returns the first failure reading stored runs.
pub async fn resume_run_index(sinks: &[Box<dyn ReportSink>], first: u64) -> AppResult<RunIndex> {
    let mut run = RunIndex::starting_at(first);
    for sink in sinks {
        run = run.max(sink.next_run_index(first).await?);
    }
    Ok(run)
}

/// Writes one run to every sink, stopping at the first failure.
///
/// # Errors
///
/// Returns the first sink failure.
pub async fn write_reports(
    sinks: &[Box<dyn ReportSink>],
    context: &ReportContext,
    run: RunIndex,
    metrics: &Metrics,
) -> AppResult<()> {
    for sink in sinks {
        sink.write_report(context, run, metrics).await?;
        tracing::info!(sink = sink.name(), run = run.value(), label = %context.label, "Report written");
    }
    Ok(())
}
