use super::*;
use crate::error::{AppError, AppResult, ParseError};

#[test]
fn extracts_value_up_to_line_end() -> AppResult<()> {
    let value = extract_value("Total frames rendered: 120\nJanky", "Total frames rendered:")?;
    if value != "120" {
        return Err(format!("Unexpected value: {}", value).into());
    }
    Ok(())
}

#[test]
fn extracts_value_between_custom_markers() -> AppResult<()> {
    let text = "Graphics info for pid 1234 [com.example.app]\n";
    let pid = extract_between(text, "Graphics info for pid", "[")?;
    let package = extract_between(text, "[", "]")?;
    if pid != "1234" || package != "com.example.app" {
        return Err(format!("Unexpected pid/package: {}/{}", pid, package).into());
    }
    Ok(())
}

#[test]
fn end_marker_is_searched_after_start() -> AppResult<()> {
    let text = "50ms early\n50th percentile: 8ms\n";
    let value = extract_between(text, "50th percentile:", "ms")?;
    if value != "8" {
        return Err(format!("Unexpected value: {}", value).into());
    }
    Ok(())
}

#[test]
fn missing_start_key_is_a_parse_error() -> AppResult<()> {
    match extract_value("Janky frames: 3\n", "Total frames rendered:") {
        Err(AppError::Parse(ParseError::MarkerNotFound { marker })) => {
            if marker != "Total frames rendered:" {
                return Err(format!("Unexpected marker: {}", marker).into());
            }
            Ok(())
        }
        Err(err) => Err(format!("Unexpected error: {}", err).into()),
        Ok(value) => Err(format!("Expected failure, got '{}'", value).into()),
    }
}

#[test]
fn missing_end_key_is_a_parse_error() -> AppResult<()> {
    match extract_value("Total frames rendered: 120", "Total frames rendered:") {
        Err(AppError::Parse(ParseError::EndMarkerNotFound { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err).into()),
        Ok(value) => Err(format!("Expected failure, got '{}'", value).into()),
    }
}

#[test]
fn parses_histogram_buckets() -> AppResult<()> {
    let histogram = extract_histogram("HISTOGRAM: 5ms=2 10ms=3\n", "HISTOGRAM:")?;
    let expected: Histogram = [(5, 2), (10, 3)].into_iter().collect();
    if histogram != expected {
        return Err(format!("Unexpected histogram: {:?}", histogram).into());
    }
    Ok(())
}

#[test]
fn malformed_histogram_token_is_a_parse_error() -> AppResult<()> {
    for line in [
        "HISTOGRAM: 5ms=2 10=3\n",
        "HISTOGRAM: 5ms=2 10ms3\n",
        "HISTOGRAM: 5ms=x\n",
    ] {
        match extract_histogram(line, "HISTOGRAM:") {
            Err(AppError::Parse(ParseError::HistogramToken { .. })) => {}
            Err(err) => return Err(format!("Unexpected error: {}", err).into()),
            Ok(histogram) => {
                return Err(format!("Expected failure for {:?}: {:?}", line, histogram).into());
            }
        }
    }
    Ok(())
}

#[test]
fn number_parsers_report_the_field() -> AppResult<()> {
    match parse_u64("total_frames", "12x") {
        Err(AppError::Parse(ParseError::Integer { field, .. })) if field == "total_frames" => {}
        other => return Err(format!("Unexpected result: {:?}", other).into()),
    }
    let value = parse_f64("draw", " 1.50 ")?;
    if (value - 1.5).abs() > f64::EPSILON {
        return Err(format!("Unexpected value: {}", value).into());
    }
    Ok(())
}
