use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumRequest {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumResponse {
    pub result: i64,
}

pub async fn sum(
    body: Result<Json<SumRequest>, JsonRejection>,
) -> Result<Json<SumResponse>, ApiError> {
    let Json(SumRequest { a, b }) = body?;

    let result = a.checked_add(b).ok_or_else(|| {
        ApiError::UnprocessableEntity("Sum does not fit in a 64-bit integer".to_string())
    })?;

    tracing::debug!(a, b, result, "Sum computed");
    Ok(Json(SumResponse { result }))
}
