use std::fmt::Write as _;

use serde::Serialize;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::{MetricSource, Metrics, RawRecords};
use crate::sample::{GfxSample, ResponseSample};

/// Detail row of one graphics trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GfxTrialRow {
    pub trial: u64,
    pub kind: &'static str,
    pub total_frames: u64,
    pub janky_frames: u64,
    pub janky_rate: f64,
    pub p90_avg: f64,
    pub p90_sd: f64,
    pub p90_max: u64,
    pub p95_avg: f64,
    pub p95_sd: f64,
    pub p95_max: u64,
    pub p99_avg: f64,
    pub p99_sd: f64,
    pub p99_max: u64,
}

impl GfxTrialRow {
    fn new(trial: u64, sample: &GfxSample) -> Self {
        let stats = sample.stats();
        Self {
            trial,
            kind: sample.kind(),
            total_frames: stats.total_frames,
            janky_frames: stats.janky_frames,
            janky_rate: stats.janky_rate,
            p90_avg: stats.mean.p90,
            p90_sd: stats.sd.p90,
            p90_max: stats.percentiles.p90,
            p95_avg: stats.mean.p95,
            p95_sd: stats.sd.p95,
            p95_max: stats.percentiles.p95,
            p99_avg: stats.mean.p99,
            p99_sd: stats.sd.p99,
            p99_max: stats.percentiles.p99,
        }
    }
}

/// Detail row of one response trial, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTrialRow {
    pub trial: u64,
    pub response_ms: f64,
    pub compositor_ms: f64,
    pub total_ms: f64,
}

impl ResponseTrialRow {
    fn new(trial: u64, sample: &ResponseSample) -> Self {
        Self {
            trial,
            response_ms: sample.response_ms,
            compositor_ms: sample.compositor_phase_ms,
            total_ms: sample.total_ms(),
        }
    }
}

/// One aggregated value of one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub source: String,
    pub metric: String,
    pub position: u64,
    pub mean: f64,
    pub spread: f64,
}

/// Trials are numbered from 1.
pub(super) fn gfx_rows(samples: &[GfxSample]) -> Vec<GfxTrialRow> {
    (1u64..)
        .zip(samples)
        .map(|(trial, sample)| GfxTrialRow::new(trial, sample))
        .collect()
}

pub(super) fn response_rows(samples: &[ResponseSample]) -> Vec<ResponseTrialRow> {
    (1u64..)
        .zip(samples)
        .map(|(trial, sample)| ResponseTrialRow::new(trial, sample))
        .collect()
}

pub(super) fn summary_rows(source: &MetricSource) -> Vec<SummaryRow> {
    (0u64..)
        .zip(source.series.iter())
        .map(|(position, (metric, value))| SummaryRow {
            source: source.name.clone(),
            metric: metric.to_owned(),
            position,
            mean: value.mean,
            spread: value.spread,
        })
        .collect()
}

/// Per-trial detail rows of every source, as JSON.
pub(super) fn trial_rows_json(raw: &RawRecords) -> AppResult<serde_json::Value> {
    let value = match raw {
        RawRecords::Gfx(samples) => serde_json::to_value(gfx_rows(samples)),
        RawRecords::Response(samples) => serde_json::to_value(response_rows(samples)),
    };
    value.map_err(|err| AppError::sink(SinkError::SerializeJson { source: err }))
}

pub(super) fn all_summary_rows(metrics: &Metrics) -> Vec<SummaryRow> {
    metrics.sources().flat_map(summary_rows).collect()
}

pub(super) fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))
}

/// File name for a run label; characters unsafe in paths become `_`.
pub(super) fn file_stem(label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|ch| ch == '.') {
        "run".to_owned()
    } else {
        stem
    }
}
