use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::CustomerData;
use crate::domain::customer::ports::CustomerServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<ApiSuccess<CustomerData>, ApiError> {
    state
        .customer_service
        .get_customer(&customer_id)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::OK, customer.into()))
}
