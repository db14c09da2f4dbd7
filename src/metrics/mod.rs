//! Aggregated metrics per profiling source, in insertion order.
mod types;


pub use types::{
    GFX_SOURCE, MetricSeries, MetricSource, MetricValue, Metrics, RESPONSE_SOURCE, RawRecords,
};
