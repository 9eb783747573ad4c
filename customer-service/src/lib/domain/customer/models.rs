use std::fmt;

use chrono::NaiveDate;

use crate::domain::customer::errors::FieldViolation;
use crate::domain::customer::validation;
use crate::domain::customer::validation::FieldRule;
use crate::domain::customer::validation::FieldValue;

/// Customer aggregate entity.
///
/// Holds only validated values; the password is kept as a PHC hash string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: PersonName,
    pub age: Age,
    pub email: EmailAddress,
    pub phone_no: PhoneNumber,
    pub address: Address,
    pub password_hash: String,
    pub cards: Vec<Card>,
}

/// Payment card embedded in a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub card_number: CardNumber,
    pub card_type: CardType,
    pub expiration_date: NaiveDate,
    pub cvv: Cvv,
    pub name_on_card: CardHolderName,
}

/// Declares a validated string value object backed by one field rule.
macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident => $rule:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            const RULE: FieldRule = $rule;

            pub fn new(raw: impl Into<String>) -> Result<Self, FieldViolation> {
                let raw = raw.into();
                Self::RULE.check(&FieldValue::Text(&raw))?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

text_value!(
    /// Unique, user-chosen customer identifier such as `john.doe123`.
    CustomerId => validation::CUSTOMER_ID
);
text_value!(PersonName => validation::NAME);
text_value!(EmailAddress => validation::EMAIL);
text_value!(
    /// Ten digit phone number.
    PhoneNumber => validation::PHONE_NO
);
text_value!(Address => validation::ADDRESS);
text_value!(CardNumber => validation::CARD_NUMBER);
text_value!(CardHolderName => validation::NAME_ON_CARD);
text_value!(Cvv => validation::CVV);

/// Customer age in years (18 to 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(u8);

impl Age {
    pub fn new(raw: i64) -> Result<Self, FieldViolation> {
        validation::AGE.check(&FieldValue::Integer(raw))?;
        u8::try_from(raw)
            .map(Self)
            .map_err(|_| FieldViolation::new(validation::AGE.field, "must be between 18 and 100"))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that passed the strength rules.
///
/// Lives only long enough to be hashed. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Result<Self, FieldViolation> {
        let raw = raw.into();
        validation::PASSWORD.check(&FieldValue::Text(&raw))?;
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Visa,
    MasterCard,
    Amex,
}

impl CardType {
    pub fn new(raw: &str) -> Result<Self, FieldViolation> {
        validation::CARD_TYPE.check(&FieldValue::Text(raw))?;
        match raw {
            "Visa" => Ok(CardType::Visa),
            "Master Card" => Ok(CardType::MasterCard),
            _ => Ok(CardType::Amex),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Visa => "Visa",
            CardType::MasterCard => "Master Card",
            CardType::Amex => "Amex",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input for customer creation.
#[derive(Debug, Clone)]
pub struct CreateCustomerCommand {
    pub customer_id: CustomerId,
    pub name: PersonName,
    pub age: Age,
    pub email: EmailAddress,
    pub phone_no: PhoneNumber,
    pub address: Address,
    pub password: Password,
    pub cards: Vec<Card>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerCommand {
    pub customer_id: Option<CustomerId>,
    pub name: Option<PersonName>,
    pub age: Option<Age>,
    pub email: Option<EmailAddress>,
    pub phone_no: Option<PhoneNumber>,
    pub address: Option<Address>,
    pub password: Option<Password>,
}

impl UpdateCustomerCommand {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.name.is_none()
            && self.age.is_none()
            && self.email.is_none()
            && self.phone_no.is_none()
            && self.address.is_none()
            && self.password.is_none()
    }
}

/// Field changes handed to the store, with the password already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub customer_id: Option<CustomerId>,
    pub name: Option<PersonName>,
    pub age: Option<Age>,
    pub email: Option<EmailAddress>,
    pub phone_no: Option<PhoneNumber>,
    pub address: Option<Address>,
    pub password_hash: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every supplied field to `customer`.
    pub fn apply_to(self, customer: &mut Customer) {
        if let Some(customer_id) = self.customer_id {
            customer.customer_id = customer_id;
        }
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(age) = self.age {
            customer.age = age;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(phone_no) = self.phone_no {
            customer.phone_no = phone_no;
        }
        if let Some(address) = self.address {
            customer.address = address;
        }
        if let Some(password_hash) = self.password_hash {
            customer.password_hash = password_hash;
        }
    }
}

/// Lookup on one of the unique customer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerFilter {
    CustomerId(String),
    Email(String),
    PhoneNo(String),
}

impl CustomerFilter {
    /// Stored document field name.
    pub fn field(&self) -> &'static str {
        match self {
            CustomerFilter::CustomerId(_) => "customerId",
            CustomerFilter::Email(_) => "email",
            CustomerFilter::PhoneNo(_) => "phoneNo",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            CustomerFilter::CustomerId(value)
            | CustomerFilter::Email(value)
            | CustomerFilter::PhoneNo(value) => value,
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            CustomerFilter::CustomerId(value) => customer.customer_id.as_str() == value,
            CustomerFilter::Email(value) => customer.email.as_str() == value,
            CustomerFilter::PhoneNo(value) => customer.phone_no.as_str() == value,
        }
    }
}
