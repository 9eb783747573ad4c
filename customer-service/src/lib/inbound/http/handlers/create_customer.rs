use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::CustomerData;
use crate::customer::errors::Violations;
use crate::domain::customer::models::Address;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::Card;
use crate::domain::customer::models::CardHolderName;
use crate::domain::customer::models::CardNumber;
use crate::domain::customer::models::CardType;
use crate::domain::customer::models::CreateCustomerCommand;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::Cvv;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Password;
use crate::domain::customer::models::PersonName;
use crate::domain::customer::models::PhoneNumber;
use crate::domain::customer::ports::CustomerServicePort;
use crate::domain::customer::validation::parse_expiration_date;
use crate::inbound::http::router::AppState;

pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<ApiSuccess<CustomerData>, ApiError> {
    let Json(body) = body?;
    let today = state.clock.now().date_naive();

    state
        .customer_service
        .create_customer(body.try_into_command(today)?)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::CREATED, customer.into()))
}

/// HTTP request body for creating a customer (raw JSON)
///
/// Every field is optional at this stage so a missing one is reported as a
/// violation alongside all the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
    pub cards: Option<Vec<CardRequest>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub card_number: Option<String>,
    pub card_type: Option<String>,
    pub expiration_date: Option<String>,
    pub cvv: Option<String>,
    pub name_on_card: Option<String>,
}

impl CreateCustomerRequest {
    pub fn try_into_command(self, today: NaiveDate) -> Result<CreateCustomerCommand, Violations> {
        let mut violations = Violations::default();

        let customer_id = violations.required("customerId", self.customer_id, CustomerId::new);
        let name = violations.required("name", self.name, PersonName::new);
        let age = violations.required("age", self.age, Age::new);
        let email = violations.required("email", self.email, EmailAddress::new);
        let phone_no = violations.required("phoneNo", self.phone_no, PhoneNumber::new);
        let address = violations.required("address", self.address, Address::new);
        let password = violations.required("password", self.password, Password::new);

        let cards: Vec<Card> = self
            .cards
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, card)| {
                card.try_into_card(&format!("cards[{}]", index), today, &mut violations)
            })
            .collect();

        match (customer_id, name, age, email, phone_no, address, password) {
            (
                Some(customer_id),
                Some(name),
                Some(age),
                Some(email),
                Some(phone_no),
                Some(address),
                Some(password),
            ) if violations.is_empty() => Ok(CreateCustomerCommand {
                customer_id,
                name,
                age,
                email,
                phone_no,
                address,
                password,
                cards,
            }),
            _ => Err(violations),
        }
    }
}

impl CardRequest {
    fn try_into_card(
        self,
        path: &str,
        today: NaiveDate,
        violations: &mut Violations,
    ) -> Option<Card> {
        let prefix = Some(path);

        let card_number =
            violations.required_at(prefix, "cardNumber", self.card_number, CardNumber::new);
        let card_type = violations.required_at(prefix, "cardType", self.card_type, |raw: String| {
            CardType::new(&raw)
        });
        let expiration_date = violations.required_at(
            prefix,
            "expirationDate",
            self.expiration_date,
            |raw: String| parse_expiration_date(&raw, today),
        );
        let cvv = violations.required_at(prefix, "cvv", self.cvv, Cvv::new);
        let name_on_card =
            violations.required_at(prefix, "nameOnCard", self.name_on_card, CardHolderName::new);

        Some(Card {
            card_number: card_number?,
            card_type: card_type?,
            expiration_date: expiration_date?,
            cvv: cvv?,
            name_on_card: name_on_card?,
        })
    }
}
