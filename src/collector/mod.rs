//! Trace collectors: one profiling subject, repeated begin/end trials.
mod continuous;
mod gfx;
mod response;
mod snapshot;

#[cfg(test)]
mod tests;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, ValidationError};
use crate::metrics::{GFX_SOURCE, Metrics, RESPONSE_SOURCE};
use crate::sample::FrameBudget;
use crate::shell::CommandRunner;

pub use continuous::ContinuousGfxCollector;
pub use response::ResponseCollector;
pub use snapshot::SnapshotGfxCollector;

/// First API level whose `dumpsys gfxinfo` report carries reliable aggregates.
pub const SNAPSHOT_MIN_API_LEVEL: u64 = 23;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ProfilingKind {
    Gfx,
    Response,
}

impl ProfilingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProfilingKind::Gfx => GFX_SOURCE,
            ProfilingKind::Response => RESPONSE_SOURCE,
        }
    }
}

impl FromStr for ProfilingKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            GFX_SOURCE => Ok(ProfilingKind::Gfx),
            RESPONSE_SOURCE => Ok(ProfilingKind::Response),
            _ => Err(ValidationError::InvalidProfilingKind {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    Idle,
    Tracing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GfxStrategy {
    Snapshot,
    Continuous,
}

impl GfxStrategy {
    #[must_use]
    pub const fn for_api_level(api_level: u64) -> Self {
        if api_level >= SNAPSHOT_MIN_API_LEVEL {
            GfxStrategy::Snapshot
        } else {
            GfxStrategy::Continuous
        }
    }
}

/// Per-subject collector configuration.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub package: String,
    pub frame_budget: FrameBudget,
    pub poll_interval: Duration,
    pub dedup_polls: bool,
}

impl CollectorSettings {
    #[must_use]
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_owned(),
            frame_budget: FrameBudget::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            dedup_polls: true,
        }
    }
}

/// Shared contract of every collector strategy.
///
/// `begin` while tracing and `end` while idle are no-ops.
#[async_trait]
pub trait TraceCollector: Send {
    fn kind(&self) -> ProfilingKind;

    fn state(&self) -> TraceState;

    /// Starts one trial on `target`.
    ///
    /// # Errors
    ///
    /// Returns an error when the device command fails.
    async fn begin(&mut self, target: &str) -> AppResult<()>;

    /// Finishes the current trial and records its sample.
    ///
    /// # Errors
    ///
    /// Returns an error when the device command or parsing fails; the trial
    /// then produces no sample.
    async fn end(&mut self, target: &str) -> AppResult<()>;

    /// Number of completed trials.
    fn trials(&self) -> usize;

    /// Summarizes every recorded trial into `metrics`.
    fn drain_into(self: Box<Self>, metrics: &mut Metrics);
}

/// Picks the graphics collector strategy for the device's API level.
#[must_use]
pub fn gfx_collector(
    api_level: u64,
    settings: CollectorSettings,
    runner: Arc<dyn CommandRunner>,
) -> Box<dyn TraceCollector> {
    let strategy = GfxStrategy::for_api_level(api_level);
    tracing::debug!(api_level, ?strategy, package = %settings.package, "Selected gfx collector");
    match strategy {
        GfxStrategy::Snapshot => Box::new(SnapshotGfxCollector::new(settings, runner)),
        GfxStrategy::Continuous => Box::new(ContinuousGfxCollector::new(settings, runner)),
    }
}

/// Creates the collector for `kind`.
#[must_use]
pub fn create_collector(
    kind: ProfilingKind,
    api_level: u64,
    settings: CollectorSettings,
    runner: Arc<dyn CommandRunner>,
) -> Box<dyn TraceCollector> {
    match kind {
        ProfilingKind::Gfx => gfx_collector(api_level, settings, runner),
        ProfilingKind::Response => Box::new(ResponseCollector::new(&settings.package, runner)),
    }
}
