use thiserror::Error;

/// Failures talking to the greeter service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Invalid greeter base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Greeter unreachable: {0}")]
    Unavailable(String),

    #[error("Greeter answered with status {0}")]
    UpstreamStatus(u16),

    #[error("Greeter response could not be decoded: {0}")]
    InvalidResponse(String),
}
