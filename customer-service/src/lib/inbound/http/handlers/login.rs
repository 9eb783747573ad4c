use std::sync::Arc;

use auth::AuthenticationError;
use auth::AuthenticationResult;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::customer::errors::CustomerError;
use crate::domain::customer::ports::CustomerServicePort;
use crate::inbound::http::router::AppState;

const INVALID_CREDENTIALS: &str = "Incorrect username or password";

/// OAuth2 password-flow form; `username` carries the customerId.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<AuthenticationResult>, ApiError> {
    let Form(form) = form?;
    let customer = state
        .customer_service
        .get_customer(&form.username)
        .await
        .map_err(|e| match e {
            CustomerError::NotFound(_) => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            _ => ApiError::from(e),
        })?;

    let authenticator = Arc::clone(&state.authenticator);
    let subject = customer.customer_id.into_inner();
    let stored_hash = customer.password_hash;
    let password = form.password;

    let result = tokio::task::spawn_blocking(move || {
        authenticator.authenticate(&password, &stored_hash, &subject)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("Login task failed: {}", e)))?;

    match result {
        Ok(token) => {
            tracing::info!(customer_id = %form.username, "Access token issued");
            Ok(Json(token))
        }
        Err(AuthenticationError::InvalidCredentials) => {
            tracing::warn!(customer_id = %form.username, "Login rejected");
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            Err(ApiError::InternalServerError(
                "Internal server error".to_string(),
            ))
        }
    }
}
