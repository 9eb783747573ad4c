use std::error::Error as _;

use auth::GateState;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated customer in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer {
    pub customer_id: String,
}

/// Middleware that resolves the bearer token and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.gate.admit(authorization) {
        GateState::Authenticated(customer_id) => {
            req.extensions_mut()
                .insert(AuthenticatedCustomer { customer_id });
            Ok(next.run(req).await)
        }
        GateState::Rejected(reason) => {
            match reason.source() {
                Some(cause) => tracing::warn!(cause = %cause, "Token rejected"),
                None => tracing::warn!(reason = %reason, "Request rejected"),
            }
            Err(unauthorized(&reason.to_string()))
        }
        GateState::Unauthenticated => Err(unauthorized("Not authenticated")),
    }
}

fn unauthorized(message: &str) -> Response {
    let mut response = ApiError::Unauthorized(message.to_string()).into_response();

    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer"),
    );
    response
}
