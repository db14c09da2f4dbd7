use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Marker '{marker}' not found in diagnostic output.")]
    MarkerNotFound { marker: String },
    #[error("End marker '{end}' not found after '{start}'.")]
    EndMarkerNotFound { start: String, end: String },
    #[error("Malformed histogram token '{token}'. Expected '<N>ms=<count>'.")]
    HistogramToken { token: String },
    #[error("Invalid integer for '{field}': '{value}': {source}")]
    Integer {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid number for '{field}': '{value}': {source}")]
    Float {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Invalid trace timestamp in line '{line}'.")]
    TraceTimestamp { line: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
