use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::metrics::{MetricSeries, MetricValue, Metrics, RESPONSE_SOURCE, RawRecords};
use crate::sample::ResponseSample;
use crate::shell::{ATRACE_START, ATRACE_STOP, CommandRunner};
use crate::stats::TRIAL_TRIM_FRACTION;

use super::{ProfilingKind, TraceCollector, TraceState};

/// Measures input-to-compositor latency from a system trace per trial.
pub struct ResponseCollector {
    package: String,
    runner: Arc<dyn CommandRunner>,
    state: TraceState,
    samples: Vec<ResponseSample>,
}

impl ResponseCollector {
    #[must_use]
    pub fn new(package: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            package: package.to_owned(),
            runner,
            state: TraceState::Idle,
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[ResponseSample] {
        &self.samples
    }
}

#[async_trait]
impl TraceCollector for ResponseCollector {
    fn kind(&self) -> ProfilingKind {
        ProfilingKind::Response
    }

    fn state(&self) -> TraceState {
        self.state
    }

    async fn begin(&mut self, target: &str) -> AppResult<()> {
        if self.state == TraceState::Tracing {
            return Ok(());
        }
        self.runner.run(ATRACE_START, target).await?;
        self.state = TraceState::Tracing;
        Ok(())
    }

    async fn end(&mut self, target: &str) -> AppResult<()> {
        if self.state == TraceState::Idle {
            return Ok(());
        }
        self.state = TraceState::Idle;
        let output = self.runner.run(ATRACE_STOP, target).await?;
        let sample = ResponseSample::parse(&output.stdout, &self.package)?;
        if !sample.has_events() {
            tracing::warn!(
                package = %self.package,
                inputs = sample.input_ms.len(),
                frames = sample.compositor_ms.len(),
                "Trace holds no matching input/compositor pair"
            );
        }
        self.samples.push(sample);
        Ok(())
    }

    fn trials(&self) -> usize {
        self.samples.len()
    }

    fn drain_into(self: Box<Self>, metrics: &mut Metrics) {
        let response: Vec<f64> = self.samples.iter().map(|s| s.response_ms).collect();
        let compositor: Vec<f64> = self
            .samples
            .iter()
            .map(|s| s.compositor_phase_ms)
            .collect();
        let total: Vec<f64> = self.samples.iter().map(ResponseSample::total_ms).collect();

        let mut series = MetricSeries::new();
        series.insert(
            "Response",
            MetricValue::trimmed(&response, TRIAL_TRIM_FRACTION),
        );
        series.insert(
            "Surface Flinger",
            MetricValue::trimmed(&compositor, TRIAL_TRIM_FRACTION),
        );
        series.insert("Total", MetricValue::trimmed(&total, TRIAL_TRIM_FRACTION));

        tracing::debug!(trials = self.samples.len(), "Drained response samples");
        metrics.add(
            RESPONSE_SOURCE,
            series,
            RawRecords::Response(Arc::from(self.samples)),
        );
    }
}
