use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing package name (set --package or provide in config).")]
    MissingPackage,
    #[error("No profiling kinds selected.")]
    NoProfilingKinds,
    #[error("Invalid profiling kind '{value}'. Use 'gfx' or 'response'.")]
    InvalidProfilingKind { value: String },
    #[error("Value must be >= 1.")]
    MustBePositive,
    #[error("Invalid integer '{value}': {source}")]
    InvalidInteger {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Frame budget must be a finite number > 0, got '{value}'.")]
    InvalidFrameBudget { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
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
