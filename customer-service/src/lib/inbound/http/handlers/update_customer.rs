use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::customer::errors::Violations;
use crate::customer::ports::CustomerServicePort;
use crate::domain::customer::models::Address;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Password;
use crate::domain::customer::models::PersonName;
use crate::domain::customer::models::PhoneNumber;
use crate::domain::customer::models::UpdateCustomerCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::CustomerData;
use crate::inbound::http::middleware::AuthenticatedCustomer;
use crate::inbound::http::router::AppState;

/// HTTP request body for a partial customer update (raw JSON)
///
/// Cards cannot be changed here; a `cards` key is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl UpdateCustomerRequest {
    pub fn try_into_command(self) -> Result<UpdateCustomerCommand, Violations> {
        let mut violations = Violations::default();

        let command = UpdateCustomerCommand {
            customer_id: violations.optional(self.customer_id, CustomerId::new),
            name: violations.optional(self.name, PersonName::new),
            age: violations.optional(self.age, Age::new),
            email: violations.optional(self.email, EmailAddress::new),
            phone_no: violations.optional(self.phone_no, PhoneNumber::new),
            address: violations.optional(self.address, Address::new),
            password: violations.optional(self.password, Password::new),
        };

        if violations.is_empty() {
            Ok(command)
        } else {
            Err(violations)
        }
    }
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Extension(caller): Extension<AuthenticatedCustomer>,
    body: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<ApiSuccess<CustomerData>, ApiError> {
    let Json(body) = body?;
    let command = body.try_into_command()?;

    tracing::debug!(caller = %caller.customer_id, customer_id = %customer_id, "Updating customer");

    state
        .customer_service
        .update_customer(&customer_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::OK, customer.into()))
}
