use std::sync::RwLock;

use async_trait::async_trait;

use crate::customer::errors::CustomerError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerFilter;
use crate::domain::customer::models::CustomerPatch;
use crate::domain::customer::ports::CustomerRepository;

/// In-process customer store for tests and local runs.
///
/// Enforces the same uniqueness rules as the MongoDB indexes.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned<T>(_: T) -> CustomerError {
        CustomerError::DatabaseError("customer store lock poisoned".to_string())
    }
}

/// First unique field of `candidate` already held by a customer other than `skip`.
fn collision(
    customers: &[Customer],
    candidate: &Customer,
    skip: Option<usize>,
) -> Option<CustomerError> {
    let filters = [
        CustomerFilter::CustomerId(candidate.customer_id.to_string()),
        CustomerFilter::Email(candidate.email.to_string()),
        CustomerFilter::PhoneNo(candidate.phone_no.to_string()),
    ];

    filters.into_iter().find_map(|filter| {
        customers
            .iter()
            .enumerate()
            .any(|(index, existing)| Some(index) != skip && filter.matches(existing))
            .then(|| CustomerError::AlreadyExists {
                field: filter.field(),
                value: filter.value().to_string(),
            })
    })
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_one(&self, filter: &CustomerFilter) -> Result<Option<Customer>, CustomerError> {
        let customers = self.customers.read().map_err(Self::poisoned)?;
        Ok(customers
            .iter()
            .find(|customer| filter.matches(customer))
            .cloned())
    }

    async fn insert_one(&self, customer: Customer) -> Result<Customer, CustomerError> {
        let mut customers = self.customers.write().map_err(Self::poisoned)?;
        if let Some(err) = collision(&customers, &customer, None) {
            return Err(err);
        }
        customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_one(
        &self,
        customer_id: &str,
        patch: CustomerPatch,
    ) -> Result<Customer, CustomerError> {
        let mut customers = self.customers.write().map_err(Self::poisoned)?;
        let index = customers
            .iter()
            .position(|customer| customer.customer_id.as_str() == customer_id)
            .ok_or_else(|| CustomerError::NotFound(customer_id.to_string()))?;

        let mut updated = customers[index].clone();
        patch.apply_to(&mut updated);

        if let Some(err) = collision(&customers, &updated, Some(index)) {
            return Err(err);
        }

        customers[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_one(&self, customer_id: &str) -> Result<(), CustomerError> {
        let mut customers = self.customers.write().map_err(Self::poisoned)?;
        let before = customers.len();
        customers.retain(|customer| customer.customer_id.as_str() != customer_id);

        if customers.len() == before {
            return Err(CustomerError::NotFound(customer_id.to_string()));
        }
        Ok(())
    }
}
