use super::{
    AppError, CollectorError, ConfigError, ParseError, ShellError, SinkError, ValidationError,
};

impl From<&'static str> for ParseError {
    fn from(message: &'static str) -> Self {
        ParseError::TestExpectation { message }
    }
}

impl From<String> for ParseError {
    fn from(value: String) -> Self {
        ParseError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ShellError {
    fn from(message: &'static str) -> Self {
        ShellError::TestExpectation { message }
    }
}

impl From<String> for ShellError {
    fn from(value: String) -> Self {
        ShellError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for CollectorError {
    fn from(message: &'static str) -> Self {
        CollectorError::TestExpectation { message }
    }
}

impl From<String> for CollectorError {
    fn from(value: String) -> Self {
        CollectorError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for SinkError {
    fn from(message: &'static str) -> Self {
        SinkError::TestExpectation { message }
    }
}

impl From<String> for SinkError {
    fn from(value: String) -> Self {
        SinkError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for AppError {
    fn from(message: &'static str) -> Self {
        AppError::Validation(ValidationError::TestExpectation { message })
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        })
    }
}
