use std::sync::Arc;

use chrono::Duration;

use super::claims::Claims;
use super::errors::TokenError;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::secret::SigningSecret;

/// Issuer name stamped into every token.
pub const TOKEN_ISSUER: &str = "Cards and Payment System";

/// Minutes a token stays valid after issuance.
pub const TOKEN_VALIDITY_MINUTES: i64 = 10;

/// Issues and parses access tokens.
///
/// Tokens carry `sub`, `iss`, `iat` and `exp`. There is no refresh: once the
/// validity window closes the subject must log in again.
#[derive(Debug)]
pub struct TokenIssuer {
    handler: JwtHandler,
    clock: Arc<dyn Clock>,
    validity: Duration,
}

impl TokenIssuer {
    /// Create an issuer signing with `secret` and reading time from `clock`.
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler: JwtHandler::new(secret).with_issuer(TOKEN_ISSUER),
            clock,
            validity: Duration::minutes(TOKEN_VALIDITY_MINUTES),
        }
    }

    /// Length of the validity window.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token for `subject`, valid from now for the validity window.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token could not be signed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let claims = Claims::new(subject, TOKEN_ISSUER, self.clock.now(), self.validity);
        self.handler.encode(&claims)
    }

    /// Verify `token` and return its subject.
    ///
    /// # Errors
    /// * `MalformedToken` - Token cannot be decoded at all
    /// * `InvalidToken` - Signature or issuer does not verify, or a claim is missing
    /// * `ExpiredToken` - Current time is past `exp`
    pub fn parse(&self, token: &str) -> Result<String, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::ExpiredToken);
        }

        Ok(claims.sub)
    }
}
