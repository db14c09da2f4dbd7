//! Locates bounded values inside unstructured diagnostic output.
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult, ParseError};

#[cfg(test)]
mod tests;

/// Histogram bucket duration in milliseconds mapped to its occurrence count.
pub type Histogram = BTreeMap<u64, u64>;

const LINE_END: &str = "\n";
const HISTOGRAM_UNIT: &str = "ms";

/// Returns the trimmed text between the first `start_key` and the first
/// `end_key` that follows it.
///
/// # Errors
///
/// Returns [`ParseError::MarkerNotFound`] when `start_key` is absent and
/// [`ParseError::EndMarkerNotFound`] when nothing closes it.
pub fn extract_between<'text>(
    text: &'text str,
    start_key: &str,
    end_key: &str,
) -> AppResult<&'text str> {
    let start = text.find(start_key).ok_or_else(|| {
        AppError::parse(ParseError::MarkerNotFound {
            marker: start_key.to_owned(),
        })
    })?;
    let value_start = start.saturating_add(start_key.len());
    let rest = text.get(value_start..).unwrap_or_default();
    let len = rest.find(end_key).ok_or_else(|| {
        AppError::parse(ParseError::EndMarkerNotFound {
            start: start_key.to_owned(),
            end: end_key.escape_debug().to_string(),
        })
    })?;
    Ok(rest.get(..len).unwrap_or_default().trim())
}

/// Returns the trimmed remainder of the line that starts with `start_key`.
///
/// # Errors
///
/// Fails like [`extract_between`] when the key or the line end is missing.
pub fn extract_value<'text>(text: &'text str, start_key: &str) -> AppResult<&'text str> {
    extract_between(text, start_key, LINE_END)
}

/// Parses a line of `<N>ms=<count>` tokens following `start_key`.
///
/// # Errors
///
/// Returns [`ParseError::HistogramToken`] for any token that does not match
/// the bucket grammar, in addition to the errors of [`extract_value`].
pub fn extract_histogram(text: &str, start_key: &str) -> AppResult<Histogram> {
    let line = extract_value(text, start_key)?;
    let mut histogram = Histogram::new();
    for token in line.split_whitespace() {
        let (bucket, count) = parse_bucket(token)?;
        let entry = histogram.entry(bucket).or_insert(0);
        *entry = entry.saturating_add(count);
    }
    Ok(histogram)
}

fn parse_bucket(token: &str) -> AppResult<(u64, u64)> {
    let malformed = || {
        AppError::parse(ParseError::HistogramToken {
            token: token.to_owned(),
        })
    };
    let (bucket, count) = token.split_once('=').ok_or_else(malformed)?;
    let bucket = bucket.strip_suffix(HISTOGRAM_UNIT).ok_or_else(malformed)?;
    let bucket = bucket.parse::<u64>().map_err(|_err| malformed())?;
    let count = count.parse::<u64>().map_err(|_err| malformed())?;
    Ok((bucket, count))
}

/// Parses an extracted value as an unsigned integer.
///
/// # Errors
///
/// Returns [`ParseError::Integer`] when the value is not a number.
pub fn parse_u64(field: &'static str, value: &str) -> AppResult<u64> {
    value.parse::<u64>().map_err(|err| {
        AppError::parse(ParseError::Integer {
            field,
            value: value.to_owned(),
            source: err,
        })
    })
}

/// Parses an extracted value as a real number.
///
/// # Errors
///
/// Returns [`ParseError::Float`] when the value is not a number.
pub fn parse_f64(field: &'static str, value: &str) -> AppResult<f64> {
    value.trim().parse::<f64>().map_err(|err| {
        AppError::parse(ParseError::Float {
            field,
            value: value.to_owned(),
            source: err,
        })
    })
}
