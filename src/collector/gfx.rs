use std::sync::Arc;

use crate::metrics::{GFX_SOURCE, MetricSeries, MetricValue, Metrics, RawRecords};
use crate::sample::{FrameStats, GfxSample};
use crate::stats::{TRIAL_TRIM_FRACTION, trimmed_mean, trimmed_std_dev};

/// Registers the `gfx` summary for `samples`.
pub(super) fn drain_gfx(samples: Vec<GfxSample>, metrics: &mut Metrics) {
    let stats: Vec<&FrameStats> = samples.iter().map(GfxSample::stats).collect();
    let janky_rates: Vec<f64> = stats.iter().map(|trial| trial.janky_rate).collect();

    let mut series = MetricSeries::new();
    series.insert(
        "Janky Rate",
        MetricValue::new(
            trimmed_mean(&janky_rates, TRIAL_TRIM_FRACTION),
            trimmed_std_dev(&janky_rates, TRIAL_TRIM_FRACTION),
        ),
    );
    series.insert(
        "90th Percentile",
        band(&stats, |trial| (trial.mean.p90, trial.sd.p90)),
    );
    series.insert(
        "95th Percentile",
        band(&stats, |trial| (trial.mean.p95, trial.sd.p95)),
    );
    series.insert(
        "99th Percentile",
        band(&stats, |trial| (trial.mean.p99, trial.sd.p99)),
    );

    tracing::debug!(trials = samples.len(), "Drained gfx samples");
    metrics.add(GFX_SOURCE, series, RawRecords::Gfx(Arc::from(samples)));
}

/// Trimmed mean of per-trial band means, paired with the trimmed mean of
/// per-trial band standard deviations.
fn band<F>(stats: &[&FrameStats], pick: F) -> MetricValue
where
    F: Fn(&FrameStats) -> (f64, f64),
{
    let (means, sds): (Vec<f64>, Vec<f64>) = stats.iter().map(|trial| pick(trial)).unzip();
    MetricValue::new(
        trimmed_mean(&means, TRIAL_TRIM_FRACTION),
        trimmed_mean(&sds, TRIAL_TRIM_FRACTION),
    )
}
