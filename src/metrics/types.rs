use std::fmt;
use std::sync::Arc;

use crate::sample::{GfxSample, ResponseSample};
use crate::stats::{trimmed_mean, trimmed_std_dev};

pub const GFX_SOURCE: &str = "gfx";
pub const RESPONSE_SOURCE: &str = "response";

/// Width of the metric name column in the text rendering.
const NAME_COLUMN_WIDTH: usize = 16;

/// A summarized value with its spread across trials.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValue {
    pub mean: f64,
    pub spread: f64,
}

impl MetricValue {
    #[must_use]
    pub const fn new(mean: f64, spread: f64) -> Self {
        Self { mean, spread }
    }

    /// Trimmed mean and trimmed standard deviation of `values`.
    #[must_use]
    pub fn trimmed(values: &[f64], fraction: f64) -> Self {
        Self {
            mean: trimmed_mean(values, fraction),
            spread: trimmed_std_dev(values, fraction),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(
                f,
                "{:.*}+{:.*}",
                precision, self.mean, precision, self.spread
            ),
            None => write!(f, "{}+{}", self.mean, self.spread),
        }
    }
}

/// Named metric values in the order they were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    entries: Vec<(String, MetricValue)>,
}

impl MetricSeries {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `name`, keeping its original position when it already exists.
    pub fn insert(&mut self, name: &str, value: MetricValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_owned(), value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-trial samples behind a source's summary.
#[derive(Debug, Clone)]
pub enum RawRecords {
    Gfx(Arc<[GfxSample]>),
    Response(Arc<[ResponseSample]>),
}

impl RawRecords {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RawRecords::Gfx(samples) => samples.len(),
            RawRecords::Response(samples) => samples.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct MetricSource {
    pub name: String,
    pub series: MetricSeries,
    pub raw: RawRecords,
}

/// Summaries of one profiling run, keyed by source name.
///
/// Built by a single caller after every collector has ended.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    sources: Vec<MetricSource>,
}

impl Metrics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Registers `series` for `name`, replacing an earlier entry in place.
    pub fn add(&mut self, name: &str, series: MetricSeries, raw: RawRecords) {
        if let Some(source) = self.sources.iter_mut().find(|source| source.name == name) {
            source.series = series;
            source.raw = raw;
            return;
        }
        self.sources.push(MetricSource {
            name: name.to_owned(),
            series,
            raw,
        });
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricSource> {
        self.sources.iter().find(|source| source.name == name)
    }

    pub fn sources(&self) -> impl Iterator<Item = &MetricSource> {
        self.sources.iter()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for source in &self.sources {
            writeln!(f, "{}:", capitalize(&source.name))?;
            for (name, value) in source.series.iter() {
                match f.precision() {
                    Some(precision) => writeln!(
                        f,
                        "  {:<width$}: {:.precision$}",
                        name,
                        value,
                        width = NAME_COLUMN_WIDTH
                    )?,
                    None => {
                        writeln!(f, "  {:<width$}: {}", name, value, width = NAME_COLUMN_WIDTH)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
