use std::collections::BTreeMap;

use axum::extract::rejection::FormRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::customer::errors::CustomerError;
use crate::customer::errors::Violations;
use crate::domain::customer::models::Card;
use crate::domain::customer::models::Customer;

pub mod create_customer;
pub mod delete_customer;
pub mod get_customer;
pub mod login;
pub mod update_customer;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    ValidationFailed(Violations),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::UnprocessableEntity(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::UnprocessableEntity(rejection.body_text())
    }
}

impl From<Violations> for ApiError {
    fn from(violations: Violations) -> Self {
        Self::ValidationFailed(violations)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, violations) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::ValidationFailed(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(violations.into_inner()),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        let body = ApiResponseBody::new(status, ApiErrorData { message, violations });
        (status, Json(body)).into_response()
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::Validation(violations) => ApiError::ValidationFailed(violations),
            CustomerError::AlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            CustomerError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CustomerError::Password(_)
            | CustomerError::DatabaseError(_)
            | CustomerError::Unknown(_) => {
                tracing::error!(error = %err, "Customer operation failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<BTreeMap<String, Vec<String>>>,
}

/// Customer as returned by the API. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub customer_id: String,
    pub name: String,
    pub age: u8,
    pub email: String,
    pub phone_no: String,
    pub address: String,
    pub cards: Vec<CardData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub card_number: String,
    pub card_type: &'static str,
    pub expiration_date: NaiveDate,
    pub cvv: String,
    pub name_on_card: String,
}

impl From<&Customer> for CustomerData {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id.to_string(),
            name: customer.name.to_string(),
            age: customer.age.get(),
            email: customer.email.to_string(),
            phone_no: customer.phone_no.to_string(),
            address: customer.address.to_string(),
            cards: customer.cards.iter().map(CardData::from).collect(),
        }
    }
}

impl From<&Card> for CardData {
    fn from(card: &Card) -> Self {
        Self {
            card_number: card.card_number.to_string(),
            card_type: card.card_type.as_str(),
            expiration_date: card.expiration_date,
            cvv: card.cvv.to_string(),
            name_on_card: card.name_on_card.to_string(),
        }
    }
}
