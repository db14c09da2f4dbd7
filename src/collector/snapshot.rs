use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::sample::{AggregateSample, GfxSample};
use crate::shell::{CommandRunner, gfxinfo_dump, gfxinfo_reset};

use super::gfx::drain_gfx;
use super::{CollectorSettings, ProfilingKind, TraceCollector, TraceState};

/// Resets the device-side frame counters on begin and reads the aggregated
/// report once on end.
pub struct SnapshotGfxCollector {
    settings: CollectorSettings,
    runner: Arc<dyn CommandRunner>,
    state: TraceState,
    samples: Vec<GfxSample>,
}

impl SnapshotGfxCollector {
    #[must_use]
    pub fn new(settings: CollectorSettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            settings,
            runner,
            state: TraceState::Idle,
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[GfxSample] {
        &self.samples
    }
}

#[async_trait]
impl TraceCollector for SnapshotGfxCollector {
    fn kind(&self) -> ProfilingKind {
        ProfilingKind::Gfx
    }

    fn state(&self) -> TraceState {
        self.state
    }

    async fn begin(&mut self, target: &str) -> AppResult<()> {
        if self.state == TraceState::Tracing {
            return Ok(());
        }
        self.runner
            .run(&gfxinfo_reset(&self.settings.package), target)
            .await?;
        self.state = TraceState::Tracing;
        tracing::debug!(package = %self.settings.package, "gfx snapshot trial started");
        Ok(())
    }

    async fn end(&mut self, target: &str) -> AppResult<()> {
        if self.state == TraceState::Idle {
            return Ok(());
        }
        self.state = TraceState::Idle;
        let output = self
            .runner
            .run(&gfxinfo_dump(&self.settings.package), target)
            .await?;
        let sample = AggregateSample::parse(output.stdout)?;
        self.samples.push(GfxSample::Aggregate(sample));
        tracing::debug!(trial = self.samples.len(), "gfx snapshot trial recorded");
        Ok(())
    }

    fn trials(&self) -> usize {
        self.samples.len()
    }

    fn drain_into(self: Box<Self>, metrics: &mut Metrics) {
        drain_gfx(self.samples, metrics);
    }
}
