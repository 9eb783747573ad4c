use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::customer::ports::CustomerServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedCustomer;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteCustomerResponseData {
    pub message: String,
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Extension(caller): Extension<AuthenticatedCustomer>,
) -> Result<ApiSuccess<DeleteCustomerResponseData>, ApiError> {
    tracing::debug!(caller = %caller.customer_id, customer_id = %customer_id, "Deleting customer");

    state
        .customer_service
        .delete_customer(&customer_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeleteCustomerResponseData {
            message: format!("Customer deleted with customerId: {}", customer_id),
        },
    ))
}
