use crate::error::AppResult;
use crate::extract::{Histogram, extract_between, extract_histogram, extract_value, parse_u64};

use super::frames::{FrameStats, Percentiles};

const PID_MARKER: &str = "Graphics info for pid";
const PACKAGE_OPEN: &str = "[";
const PACKAGE_CLOSE: &str = "]";
const STATS_SINCE_MARKER: &str = "Stats since:";
const STATS_SINCE_UNIT: &str = "ns";
const TOTAL_FRAMES_MARKER: &str = "Total frames rendered:";
const JANKY_FRAMES_MARKER: &str = "Janky frames:";
const JANKY_FRAMES_END: &str = "(";
const P50_MARKER: &str = "50th percentile:";
const P90_MARKER: &str = "90th percentile:";
const P95_MARKER: &str = "95th percentile:";
const P99_MARKER: &str = "99th percentile:";
const PERCENTILE_UNIT: &str = "ms";
const MISSED_VSYNC_MARKER: &str = "Number Missed Vsync:";
const HIGH_INPUT_LATENCY_MARKER: &str = "Number High input latency:";
const SLOW_UI_THREAD_MARKER: &str = "Number Slow UI thread:";
const SLOW_BITMAP_UPLOADS_MARKER: &str = "Number Slow bitmap uploads:";
const SLOW_DRAW_COMMANDS_MARKER: &str = "Number Slow issue draw commands:";
const HISTOGRAM_MARKER: &str = "HISTOGRAM:";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefectCounters {
    pub missed_vsync: u64,
    pub high_input_latency: u64,
    pub slow_ui_thread: u64,
    pub slow_bitmap_uploads: u64,
    pub slow_issue_draw_commands: u64,
}

/// A trial read from the platform's pre-aggregated frame report.
#[derive(Debug, Clone)]
pub struct AggregateSample {
    pub pid: u64,
    pub package: String,
    pub stats_since_ns: u64,
    pub defects: DefectCounters,
    pub histogram: Histogram,
    /// Per-frame durations expanded from the histogram, ascending.
    pub frame_ms: Vec<f64>,
    pub stats: FrameStats,
    raw: String,
}

impl AggregateSample {
    /// Parses one `dumpsys gfxinfo <package>` report.
    ///
    /// # Errors
    ///
    /// Returns a parse error when any required marker is missing or a value
    /// is malformed; no partial sample is produced.
    pub fn parse(raw: String) -> AppResult<Self> {
        let text = raw.as_str();
        let pid = parse_u64("pid", extract_between(text, PID_MARKER, PACKAGE_OPEN)?)?;
        let package = extract_between(text, PACKAGE_OPEN, PACKAGE_CLOSE)?.to_owned();
        let stats_since_ns = parse_u64(
            "stats_since",
            extract_between(text, STATS_SINCE_MARKER, STATS_SINCE_UNIT)?,
        )?;
        let total_frames = parse_u64("total_frames", extract_value(text, TOTAL_FRAMES_MARKER)?)?;
        let janky_frames = parse_u64(
            "janky_frames",
            extract_between(text, JANKY_FRAMES_MARKER, JANKY_FRAMES_END)?,
        )?;
        let percentiles = Percentiles {
            p50: parse_percentile(text, P50_MARKER)?,
            p90: parse_percentile(text, P90_MARKER)?,
            p95: parse_percentile(text, P95_MARKER)?,
            p99: parse_percentile(text, P99_MARKER)?,
        };
        let defects = DefectCounters {
            missed_vsync: parse_counter(text, "missed_vsync", MISSED_VSYNC_MARKER)?,
            high_input_latency: parse_counter(
                text,
                "high_input_latency",
                HIGH_INPUT_LATENCY_MARKER,
            )?,
            slow_ui_thread: parse_counter(text, "slow_ui_thread", SLOW_UI_THREAD_MARKER)?,
            slow_bitmap_uploads: parse_counter(
                text,
                "slow_bitmap_uploads",
                SLOW_BITMAP_UPLOADS_MARKER,
            )?,
            slow_issue_draw_commands: parse_counter(
                text,
                "slow_issue_draw_commands",
                SLOW_DRAW_COMMANDS_MARKER,
            )?,
        };
        let histogram = extract_histogram(text, HISTOGRAM_MARKER)?;
        let frame_ms = expand_histogram(&histogram);
        let stats = FrameStats::reported(total_frames, janky_frames, percentiles, &frame_ms);

        tracing::debug!(
            pid,
            package = %package,
            total_frames,
            janky_frames,
            "Parsed aggregate gfx sample"
        );

        Ok(Self {
            pid,
            package,
            stats_since_ns,
            defects,
            histogram,
            frame_ms,
            stats,
            raw,
        })
    }

    /// The dump text this sample was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

fn parse_percentile(text: &str, marker: &'static str) -> AppResult<u64> {
    parse_u64(marker, extract_between(text, marker, PERCENTILE_UNIT)?)
}

fn parse_counter(text: &str, field: &'static str, marker: &str) -> AppResult<u64> {
    parse_u64(field, extract_value(text, marker)?)
}

/// Repeats every bucket duration `count` times.
pub(crate) fn expand_histogram(histogram: &Histogram) -> Vec<f64> {
    histogram
        .iter()
        .flat_map(|(bucket_ms, count)| {
            let repeat = usize::try_from(*count).unwrap_or(usize::MAX);
            std::iter::repeat_n(*bucket_ms as f64, repeat)
        })
        .collect()
}
