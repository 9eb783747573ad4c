use std::sync::Arc;

use thiserror::Error;

use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;

/// Why a request was turned away.
///
/// The display text is safe to send to clients; the wrapped token error is
/// for logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Missing or invalid Authorization header")]
    MissingCredentials,

    #[error("Invalid or expired token")]
    InvalidOrExpired(#[source] TokenError),
}

/// Authentication state of a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Unauthenticated,
    Authenticated(String),
    Rejected(RejectReason),
}

impl GateState {
    /// Resolved states never change again.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, GateState::Unauthenticated)
    }

    /// Subject of an authenticated request.
    pub fn subject(&self) -> Option<&str> {
        match self {
            GateState::Authenticated(subject) => Some(subject),
            _ => None,
        }
    }
}

/// Resolves caller identity from an `Authorization` header.
///
/// Identity only: the gate never decides what a subject may do.
#[derive(Debug, Clone)]
pub struct AuthGate {
    issuer: Arc<TokenIssuer>,
}

impl AuthGate {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Resolve a fresh request from its raw `Authorization` header value.
    pub fn admit(&self, authorization: Option<&str>) -> GateState {
        self.advance(GateState::Unauthenticated, authorization)
    }

    /// Move `state` forward. Already-resolved states are returned as-is.
    pub fn advance(&self, state: GateState, authorization: Option<&str>) -> GateState {
        if state.is_resolved() {
            return state;
        }

        let Some(token) = authorization.and_then(bearer_token) else {
            return GateState::Rejected(RejectReason::MissingCredentials);
        };

        match self.issuer.parse(token) {
            Ok(subject) => GateState::Authenticated(subject),
            Err(e) => GateState::Rejected(RejectReason::InvalidOrExpired(e)),
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for other schemes
/// or an empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
