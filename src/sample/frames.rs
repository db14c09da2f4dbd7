use crate::error::ValidationError;
use crate::stats::{trimmed_max, trimmed_mean, trimmed_std_dev};

/// Nominal 60 Hz frame budget; slower frames count as janky.
pub const DEFAULT_FRAME_BUDGET_MS: f64 = 16.666;

/// Trim fractions whose trimmed mean/sd describe the 50/90/95/99th bands.
const BAND_TRIM_FRACTIONS: [f64; 4] = [0.25, 0.05, 0.025, 0.005];
/// One-sided trims approximating the 50/90/95/99th percentiles.
const PERCENTILE_TRIM_FRACTIONS: [f64; 4] = [0.5, 0.1, 0.05, 0.01];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBudget(f64);

impl FrameBudget {
    /// Creates a frame budget in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error when `ms` is not a finite positive number.
    pub fn new(ms: f64) -> Result<Self, ValidationError> {
        if !ms.is_finite() || ms <= 0.0 {
            return Err(ValidationError::InvalidFrameBudget {
                value: ms.to_string(),
            });
        }
        Ok(Self(ms))
    }

    #[must_use]
    pub const fn as_ms(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_janky(self, frame_ms: f64) -> bool {
        frame_ms > self.0
    }
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self(DEFAULT_FRAME_BUDGET_MS)
    }
}

/// A value per tail band: 50th, 90th, 95th and 99th.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bands {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Bands {
    fn from_fn<F>(fractions: [f64; 4], mut reduce: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let [p50, p90, p95, p99] = fractions;
        Self {
            p50: reduce(p50),
            p90: reduce(p90),
            p95: reduce(p95),
            p99: reduce(p99),
        }
    }
}

/// Frame latency percentiles in whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Percentiles {
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
}

impl Percentiles {
    fn trimmed_from(frame_ms: &[f64]) -> Self {
        let bands = Bands::from_fn(PERCENTILE_TRIM_FRACTIONS, |fraction| {
            trimmed_max(frame_ms, fraction)
        });
        Self {
            p50: whole_ms(bands.p50),
            p90: whole_ms(bands.p90),
            p95: whole_ms(bands.p95),
            p99: whole_ms(bands.p99),
        }
    }
}

fn whole_ms(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Derived per-trial frame statistics shared by both graphics sample shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub total_frames: u64,
    pub janky_frames: u64,
    pub janky_rate: f64,
    pub percentiles: Percentiles,
    pub mean: Bands,
    pub sd: Bands,
}

impl FrameStats {
    /// Statistics for a dump that already reports counts and percentiles.
    pub(crate) fn reported(
        total_frames: u64,
        janky_frames: u64,
        percentiles: Percentiles,
        frame_ms: &[f64],
    ) -> Self {
        Self {
            total_frames,
            janky_frames,
            janky_rate: janky_rate(janky_frames, total_frames),
            percentiles,
            mean: Bands::from_fn(BAND_TRIM_FRACTIONS, |fraction| {
                trimmed_mean(frame_ms, fraction)
            }),
            sd: Bands::from_fn(BAND_TRIM_FRACTIONS, |fraction| {
                trimmed_std_dev(frame_ms, fraction)
            }),
        }
    }

    /// Statistics computed client-side from raw per-frame durations.
    pub(crate) fn measured(frame_ms: &[f64], budget: FrameBudget) -> Self {
        let total_frames = frame_ms.len() as u64;
        let janky_frames = frame_ms.iter().filter(|ms| budget.is_janky(**ms)).count() as u64;
        Self::reported(
            total_frames,
            janky_frames,
            Percentiles::trimmed_from(frame_ms),
            frame_ms,
        )
    }
}

fn janky_rate(janky_frames: u64, total_frames: u64) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    janky_frames as f64 / total_frames as f64
}
