use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Every field is required: a token missing any of them does not decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (customer identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` valid for `validity` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Identity the token vouches for
    /// * `issuer` - Issuer name
    /// * `issued_at` - Issue instant
    /// * `validity` - Length of the validity window
    pub fn new(
        subject: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + validity).timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its expiry second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
