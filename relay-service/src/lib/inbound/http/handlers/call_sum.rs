use axum::extract::State;
use axum::Json;

use super::ApiError;
use crate::greeter::ports::SumResult;
use crate::inbound::http::router::AppState;

const A: i64 = 10;
const B: i64 = 20;

/// Ask the greeter service to add the fixed operands 10 and 20.
pub async fn call_sum(State(state): State<AppState>) -> Result<Json<SumResult>, ApiError> {
    state
        .greeter
        .sum(A, B)
        .await
        .map(Json)
        .map_err(ApiError::from)
}
