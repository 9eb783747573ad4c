use std::sync::Arc;

use serde::Serialize;

use crate::clock::Clock;
use crate::gate::AuthGate;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::secret::SigningSecret;

/// Authentication coordinator combining password verification and token issuance.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
}

/// Result of successful authentication, shaped like an OAuth2 token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Token signing key
    /// * `clock` - Time source for token issuance and expiry
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: Arc::new(TokenIssuer::new(secret, clock)),
        }
    }

    /// Replace the password hasher, e.g. to apply configured cost.
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }

    /// Gate that resolves bearer tokens issued by this authenticator.
    pub fn gate(&self) -> AuthGate {
        AuthGate::new(Arc::clone(&self.token_issuer))
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token for `subject`.
    ///
    /// CPU-heavy; async callers should run it on a blocking thread.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_issuer.issue(subject)?;

        Ok(AuthenticationResult {
            access_token,
            token_type: "Bearer",
        })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed
    pub fn issue_token(&self, subject: &str) -> Result<String, TokenError> {
        self.token_issuer.issue(subject)
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, invalid or expired
    pub fn validate_token(&self, token: &str) -> Result<String, TokenError> {
        self.token_issuer.parse(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::gate::GateState;
    use crate::password::HashingCost;

    fn authenticator() -> Authenticator {
        let hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();

        Authenticator::new(&SigningSecret::generate(), Arc::new(SystemClock))
            .with_password_hasher(hasher)
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "Secure@Pass1";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "john.doe123")
            .expect("Authentication failed");

        assert_eq!(result.token_type, "Bearer");
        assert_eq!(
            authenticator
                .validate_token(&result.access_token)
                .expect("Token validation failed"),
            "john.doe123"
        );
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("Secure@Pass1").unwrap();

        let result = authenticator.authenticate("Wrong@Pass1", &hash, "john.doe123");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_gate_accepts_issued_token() {
        let authenticator = authenticator();
        let token = authenticator.issue_token("john.doe123").unwrap();

        let state = authenticator
            .gate()
            .admit(Some(&format!("Bearer {}", token)));
        assert_eq!(state, GateState::Authenticated("john.doe123".to_string()));
    }

    #[test]
    fn test_result_serializes_as_oauth2_token() {
        let result = AuthenticationResult {
            access_token: "abc".to_string(),
            token_type: "Bearer",
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"access_token": "abc", "token_type": "Bearer"})
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}
