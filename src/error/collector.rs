use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Polling task for '{package}' ended abnormally: {source}")]
    PollerJoin {
        package: String,
        #[source]
        source: tokio::task::JoinError,
    },
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
