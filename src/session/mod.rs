//! Orchestrates collectors across repeated trials of one profiling run.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::collector::{
    CollectorSettings, ProfilingKind, TraceCollector, TraceState, create_collector,
};
use crate::error::{AppError, AppResult, ValidationError};
use crate::metrics::Metrics;
use crate::shell::{CommandRunner, query_api_level};

/// One collector per profiling kind against a single device and package.
pub struct ProfilingSession {
    runner: Arc<dyn CommandRunner>,
    target: String,
    api_level: u64,
    settings: CollectorSettings,
    collectors: BTreeMap<ProfilingKind, Box<dyn TraceCollector>>,
    profiling: bool,
}

impl ProfilingSession {
    #[must_use]
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        target: &str,
        api_level: u64,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            runner,
            target: target.to_owned(),
            api_level,
            settings,
            collectors: BTreeMap::new(),
            profiling: false,
        }
    }

    /// Creates a session, asking the device for its API level unless given.
    ///
    /// # Errors
    ///
    /// Returns an error when the API level query fails.
    pub async fn open(
        runner: Arc<dyn CommandRunner>,
        target: &str,
        api_level: Option<u64>,
        settings: CollectorSettings,
    ) -> AppResult<Self> {
        let api_level = match api_level {
            Some(level) => level,
            None => query_api_level(runner.as_ref(), target).await?,
        };
        tracing::info!(target, api_level, package = %settings.package, "Profiling session opened");
        Ok(Self::new(runner, target, api_level, settings))
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn api_level(&self) -> u64 {
        self.api_level
    }

    #[must_use]
    pub const fn is_profiling(&self) -> bool {
        self.profiling
    }

    /// Completed trials of the collector for `kind`, if one exists.
    #[must_use]
    pub fn trials(&self, kind: ProfilingKind) -> Option<usize> {
        self.collectors.get(&kind).map(|collector| collector.trials())
    }

    /// Begins a trial on every requested collector, creating missing ones.
    ///
    /// Calling `start` while a trial is running does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when no kind is requested or a collector fails to
    /// begin; collectors already begun are ended again.
    pub async fn start(&mut self, kinds: &[ProfilingKind]) -> AppResult<()> {
        if self.profiling {
            return Ok(());
        }
        if kinds.is_empty() {
            return Err(AppError::validation(ValidationError::NoProfilingKinds));
        }
        for kind in kinds {
            let collector = self.collectors.entry(*kind).or_insert_with(|| {
                create_collector(
                    *kind,
                    self.api_level,
                    self.settings.clone(),
                    Arc::clone(&self.runner),
                )
            });
            if let Err(err) = collector.begin(&self.target).await {
                tracing::error!("Failed to begin {} trial: {}", kind.as_str(), err);
                self.profiling = true;
                if let Err(cleanup) = self.pause().await {
                    tracing::warn!("Failed to end collectors after begin failure: {}", cleanup);
                }
                return Err(err);
            }
        }
        self.profiling = true;
        Ok(())
    }

    /// Ends the running trial on every collector.
    ///
    /// Every tracing collector is ended even when an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure reported by a collector.
    pub async fn pause(&mut self) -> AppResult<()> {
        if !self.profiling {
            return Ok(());
        }
        let mut first_error = None;
        for (kind, collector) in &mut self.collectors {
            if collector.state() == TraceState::Tracing
                && let Err(err) = collector.end(&self.target).await
            {
                tracing::error!("Failed to end {} trial: {}", kind.as_str(), err);
                first_error.get_or_insert(err);
            }
        }
        self.profiling = false;
        first_error.map_or(Ok(()), Err)
    }

    /// Ends any running trial and drains every collector into a fresh
    /// [`Metrics`], graphics before response. The session is empty afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when ending a running trial fails; no metrics are
    /// produced in that case.
    pub async fn finish(&mut self) -> AppResult<Metrics> {
        self.pause().await?;
        let mut metrics = Metrics::new();
        for (kind, collector) in std::mem::take(&mut self.collectors) {
            tracing::debug!(kind = kind.as_str(), trials = collector.trials(), "Draining collector");
            collector.drain_into(&mut metrics);
        }
        Ok(metrics)
    }
}
