//! Typed samples parsed from one trial's diagnostic output.
mod aggregate;
mod frames;
mod incremental;
mod response;


pub use aggregate::{AggregateSample, DefectCounters};
pub use frames::{Bands, DEFAULT_FRAME_BUDGET_MS, FrameBudget, FrameStats, Percentiles};
pub use incremental::{FrameAccumulator, IncrementalSample};
pub use response::{NO_MATCH_MS, ResponseSample};

/// One graphics trial, in the shape produced by the collector strategy.
#[derive(Debug, Clone)]
pub enum GfxSample {
    Aggregate(AggregateSample),
    Incremental(IncrementalSample),
}

impl GfxSample {
    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        match self {
            GfxSample::Aggregate(sample) => &sample.stats,
            GfxSample::Incremental(sample) => &sample.stats,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            GfxSample::Aggregate(_) => "aggregate",
            GfxSample::Incremental(_) => "incremental",
        }
    }
}
