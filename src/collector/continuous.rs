use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::{sync::watch, task::JoinHandle};

use crate::error::{AppError, AppResult, CollectorError};
use crate::metrics::Metrics;
use crate::sample::{FrameAccumulator, GfxSample};
use crate::shell::{CommandRunner, gfxinfo_dump, gfxinfo_reset};

use super::gfx::drain_gfx;
use super::{CollectorSettings, ProfilingKind, TraceCollector, TraceState};

/// Background polling task of one trial. The task owns the accumulator and
/// hands it back when joined.
struct Poller {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<AppResult<FrameAccumulator>>,
}

/// Polls raw per-frame profile data while a trial runs and aggregates it
/// client-side.
pub struct ContinuousGfxCollector {
    settings: CollectorSettings,
    runner: Arc<dyn CommandRunner>,
    poller: Option<Poller>,
    samples: Vec<GfxSample>,
}

impl ContinuousGfxCollector {
    #[must_use]
    pub fn new(settings: CollectorSettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            settings,
            runner,
            poller: None,
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[GfxSample] {
        &self.samples
    }
}

impl Drop for ContinuousGfxCollector {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            drop(poller.stop_tx.send(true));
            poller.handle.abort();
        }
    }
}

#[async_trait]
impl TraceCollector for ContinuousGfxCollector {
    fn kind(&self) -> ProfilingKind {
        ProfilingKind::Gfx
    }

    fn state(&self) -> TraceState {
        if self.poller.is_some() {
            TraceState::Tracing
        } else {
            TraceState::Idle
        }
    }

    async fn begin(&mut self, target: &str) -> AppResult<()> {
        if self.poller.is_some() {
            return Ok(());
        }
        self.runner
            .run(&gfxinfo_reset(&self.settings.package), target)
            .await?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let accumulator =
            FrameAccumulator::new(self.settings.frame_budget, self.settings.dedup_polls);
        let handle = tokio::spawn(poll_profile_data(
            Arc::clone(&self.runner),
            gfxinfo_dump(&self.settings.package),
            target.to_owned(),
            self.settings.poll_interval,
            accumulator,
            stop_rx,
        ));
        self.poller = Some(Poller { stop_tx, handle });
        tracing::debug!(package = %self.settings.package, "gfx polling trial started");
        Ok(())
    }

    async fn end(&mut self, _target: &str) -> AppResult<()> {
        let Some(poller) = self.poller.take() else {
            return Ok(());
        };
        drop(poller.stop_tx.send(true));
        let accumulator = poller.handle.await.map_err(|err| {
            AppError::collector(CollectorError::PollerJoin {
                package: self.settings.package.clone(),
                source: err,
            })
        })??;
        self.samples
            .push(GfxSample::Incremental(accumulator.finalize()));
        tracing::debug!(trial = self.samples.len(), "gfx polling trial recorded");
        Ok(())
    }

    fn trials(&self) -> usize {
        self.samples.len()
    }

    fn drain_into(mut self: Box<Self>, metrics: &mut Metrics) {
        let samples = std::mem::take(&mut self.samples);
        drain_gfx(samples, metrics);
    }
}

/// Sleeps `interval`, dumps profile data and feeds it to `accumulator` until
/// stopped. A stop request interrupts the sleep but never a running dump.
async fn poll_profile_data(
    runner: Arc<dyn CommandRunner>,
    command: String,
    target: String,
    interval: Duration,
    mut accumulator: FrameAccumulator,
    mut stop_rx: watch::Receiver<bool>,
) -> AppResult<FrameAccumulator> {
    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            () = tokio::time::sleep(interval) => {}
        }
        let output = runner.run(&command, &target).await.inspect_err(|err| {
            tracing::error!("gfx poll failed: {}", err);
        })?;
        let appended = accumulator.add_chunk(&output.stdout)?;
        tracing::trace!(appended, total = accumulator.frame_count(), "gfx poll");
        if *stop_rx.borrow() {
            break;
        }
    }
    Ok(accumulator)
}
