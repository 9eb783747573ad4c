use async_trait::async_trait;
use chrono::NaiveDate;
use mongodb::bson::doc;
use mongodb::bson::Document;
use mongodb::error::Error as MongoError;
use mongodb::error::ErrorKind;
use mongodb::error::WriteFailure;
use mongodb::options::IndexOptions;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use mongodb::Database;
use mongodb::IndexModel;
use serde::Deserialize;
use serde::Serialize;

use crate::customer::errors::CustomerError;
use crate::customer::errors::FieldViolation;
use crate::domain::customer::models::Address;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::Card;
use crate::domain::customer::models::CardHolderName;
use crate::domain::customer::models::CardNumber;
use crate::domain::customer::models::CardType;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerFilter;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::CustomerPatch;
use crate::domain::customer::models::Cvv;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::PersonName;
use crate::domain::customer::models::PhoneNumber;
use crate::domain::customer::ports::CustomerRepository;

const DUPLICATE_KEY: i32 = 11000;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique indexes on the customer collection: (field, index name).
const UNIQUE_FIELDS: [(&str, &str); 3] = [
    ("customerId", "customerId_unique"),
    ("email", "email_unique"),
    ("phoneNo", "phoneNo_unique"),
];

/// Customer document as stored; `password` holds the PHC hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerDocument {
    customer_id: String,
    name: String,
    age: i32,
    email: String,
    phone_no: String,
    address: String,
    password: String,
    // Absent or null when the customer registered without cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cards: Option<Vec<CardDocument>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardDocument {
    card_number: String,
    card_type: String,
    expiration_date: String,
    cvv: String,
    name_on_card: String,
}

impl From<&Customer> for CustomerDocument {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id.to_string(),
            name: customer.name.to_string(),
            age: i32::from(customer.age.get()),
            email: customer.email.to_string(),
            phone_no: customer.phone_no.to_string(),
            address: customer.address.to_string(),
            password: customer.password_hash.clone(),
            cards: (!customer.cards.is_empty())
                .then(|| customer.cards.iter().map(CardDocument::from).collect()),
        }
    }
}

impl From<&Card> for CardDocument {
    fn from(card: &Card) -> Self {
        Self {
            card_number: card.card_number.to_string(),
            card_type: card.card_type.to_string(),
            expiration_date: card.expiration_date.format(DATE_FORMAT).to_string(),
            cvv: card.cvv.to_string(),
            name_on_card: card.name_on_card.to_string(),
        }
    }
}

impl TryFrom<CustomerDocument> for Customer {
    type Error = CustomerError;

    fn try_from(document: CustomerDocument) -> Result<Self, Self::Error> {
        Ok(Customer {
            customer_id: CustomerId::new(document.customer_id).map_err(corrupt)?,
            name: PersonName::new(document.name).map_err(corrupt)?,
            age: Age::new(i64::from(document.age)).map_err(corrupt)?,
            email: EmailAddress::new(document.email).map_err(corrupt)?,
            phone_no: PhoneNumber::new(document.phone_no).map_err(corrupt)?,
            address: Address::new(document.address).map_err(corrupt)?,
            password_hash: document.password,
            cards: document
                .cards
                .unwrap_or_default()
                .into_iter()
                .map(Card::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<CardDocument> for Card {
    type Error = CustomerError;

    // Stored cards may have expired since they were written, so the date is
    // parsed but not checked against today.
    fn try_from(document: CardDocument) -> Result<Self, Self::Error> {
        let expiration_date = NaiveDate::parse_from_str(&document.expiration_date, DATE_FORMAT)
            .map_err(|e| {
                CustomerError::DatabaseError(format!("Stored expirationDate is invalid: {}", e))
            })?;

        Ok(Card {
            card_number: CardNumber::new(document.card_number).map_err(corrupt)?,
            card_type: CardType::new(&document.card_type).map_err(corrupt)?,
            expiration_date,
            cvv: Cvv::new(document.cvv).map_err(corrupt)?,
            name_on_card: CardHolderName::new(document.name_on_card).map_err(corrupt)?,
        })
    }
}

fn corrupt(violation: FieldViolation) -> CustomerError {
    CustomerError::DatabaseError(format!("Stored document is invalid: {}", violation))
}

fn filter_document(filter: &CustomerFilter) -> Document {
    let mut document = Document::new();
    document.insert(filter.field(), filter.value());
    document
}

fn set_document(patch: CustomerPatch) -> Document {
    let mut set = Document::new();
    if let Some(customer_id) = patch.customer_id {
        set.insert("customerId", customer_id.into_inner());
    }
    if let Some(name) = patch.name {
        set.insert("name", name.into_inner());
    }
    if let Some(age) = patch.age {
        set.insert("age", i32::from(age.get()));
    }
    if let Some(email) = patch.email {
        set.insert("email", email.into_inner());
    }
    if let Some(phone_no) = patch.phone_no {
        set.insert("phoneNo", phone_no.into_inner());
    }
    if let Some(address) = patch.address {
        set.insert("address", address.into_inner());
    }
    if let Some(password_hash) = patch.password_hash {
        set.insert("password", password_hash);
    }
    set
}

/// Map a duplicate-key write error to `AlreadyExists` on the offending field.
///
/// The server names the violated index in the message, e.g.
/// `E11000 duplicate key error collection: bank.customers index: email_unique dup key: ...`.
fn map_write_error(error: MongoError, customer: &CustomerDocument) -> CustomerError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = error.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            let value = |field: &str| match field {
                "customerId" => customer.customer_id.clone(),
                "email" => customer.email.clone(),
                _ => customer.phone_no.clone(),
            };

            if let Some(&(field, _)) = UNIQUE_FIELDS
                .iter()
                .find(|(_, index)| write_error.message.contains(*index))
            {
                return CustomerError::AlreadyExists {
                    field,
                    value: value(field),
                };
            }
        }
    }
    CustomerError::DatabaseError(error.to_string())
}

/// Customer repository backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoCustomerRepository {
    collection: Collection<CustomerDocument>,
}

impl MongoCustomerRepository {
    /// Open the collection and make sure the unique indexes exist.
    pub async fn new(database: &Database, collection: &str) -> Result<Self, CustomerError> {
        let collection = database.collection::<CustomerDocument>(collection);

        let indexes: Vec<IndexModel> = UNIQUE_FIELDS
            .iter()
            .map(|&(field, name)| {
                let mut keys = Document::new();
                keys.insert(field, 1);
                IndexModel::builder()
                    .keys(keys)
                    .options(Some(
                        IndexOptions::builder()
                            .unique(true)
                            .name(name.to_string())
                            .build(),
                    ))
                    .build()
            })
            .collect();

        collection
            .create_indexes(indexes)
            .await
            .map_err(|e| CustomerError::DatabaseError(format!("Failed to create indexes: {}", e)))?;

        tracing::info!(
            collection = %collection.name(),
            "Customer collection ready"
        );

        Ok(Self { collection })
    }
}

#[async_trait]
impl CustomerRepository for MongoCustomerRepository {
    async fn find_one(&self, filter: &CustomerFilter) -> Result<Option<Customer>, CustomerError> {
        self.collection
            .find_one(filter_document(filter))
            .await
            .map_err(|e| CustomerError::DatabaseError(e.to_string()))?
            .map(Customer::try_from)
            .transpose()
    }

    async fn insert_one(&self, customer: Customer) -> Result<Customer, CustomerError> {
        let document = CustomerDocument::from(&customer);

        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| map_write_error(e, &document))?;

        Ok(customer)
    }

    async fn update_one(
        &self,
        customer_id: &str,
        patch: CustomerPatch,
    ) -> Result<Customer, CustomerError> {
        // Values used to name the colliding field if an index rejects the update.
        let attempted = CustomerDocument {
            customer_id: patch
                .customer_id
                .as_ref()
                .map_or_else(|| customer_id.to_string(), ToString::to_string),
            email: patch
                .email
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            phone_no: patch
                .phone_no
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            name: String::new(),
            age: 0,
            address: String::new(),
            password: String::new(),
            cards: None,
        };

        let set = set_document(patch);
        if set.is_empty() {
            return self
                .find_one(&CustomerFilter::CustomerId(customer_id.to_string()))
                .await?
                .ok_or_else(|| CustomerError::NotFound(customer_id.to_string()));
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "customerId": customer_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write_error(e, &attempted))?
            .ok_or_else(|| CustomerError::NotFound(customer_id.to_string()))?;

        Customer::try_from(updated)
    }

    async fn delete_one(&self, customer_id: &str) -> Result<(), CustomerError> {
        let result = self
            .collection
            .delete_one(doc! { "customerId": customer_id })
            .await
            .map_err(|e| CustomerError::DatabaseError(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(CustomerError::NotFound(customer_id.to_string()));
        }

        Ok(())
    }
}
