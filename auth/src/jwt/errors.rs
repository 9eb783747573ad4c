use thiserror::Error;

/// Error type for JWT operations.
///
/// Display strings are for logs. Callers facing the network should collapse
/// every variant into one generic message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token could not be decoded")]
    MalformedToken,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    ExpiredToken,
}
