//! Authentication utilities library
//!
//! Provides the authentication core shared by the services:
//! - Password hashing (Argon2id, PHC strings)
//! - Signed, time-bounded access tokens (JWT, HS512)
//! - Bearer-token gate for inbound requests
//! - Injectable clock so expiry can be tested without sleeping
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Secure@Pass1").unwrap();
//! assert!(hasher.verify("Secure@Pass1", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{SigningSecret, SystemClock, TokenIssuer};
//!
//! let secret = SigningSecret::generate();
//! let issuer = TokenIssuer::new(&secret, Arc::new(SystemClock));
//! let token = issuer.issue("john.doe123").unwrap();
//! assert_eq!(issuer.parse(&token).unwrap(), "john.doe123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//!
//! use auth::{Authenticator, GateState, SigningSecret, SystemClock};
//!
//! let auth = Authenticator::new(&SigningSecret::generate(), Arc::new(SystemClock));
//!
//! // Register: hash password
//! let hash = auth.hash_password("Secure@Pass1").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("Secure@Pass1", &hash, "john.doe123").unwrap();
//!
//! // Protected request: resolve the caller
//! let header = format!("Bearer {}", result.access_token);
//! let state = auth.gate().admit(Some(&header));
//! assert_eq!(state, GateState::Authenticated("john.doe123".to_string()));
//! ```

pub mod authenticator;
pub mod clock;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod secret;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use gate::AuthGate;
pub use gate::GateState;
pub use gate::RejectReason;
pub use jwt::Claims;
pub use jwt::JwtHandler;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::SecretError;
pub use secret::SigningSecret;
