use async_trait::async_trait;

use crate::domain::customer::errors::CustomerError;
use crate::domain::customer::models::CreateCustomerCommand;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerFilter;
use crate::domain::customer::models::CustomerPatch;
use crate::domain::customer::models::UpdateCustomerCommand;

/// Port for customer domain service operations.
#[async_trait]
pub trait CustomerServicePort: Send + Sync + 'static {
    /// Create a new customer with a hashed password.
    ///
    /// # Errors
    /// * `AlreadyExists` - customerId, email or phoneNo is taken
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn create_customer(&self, command: CreateCustomerCommand)
        -> Result<Customer, CustomerError>;

    /// Retrieve a customer by customerId.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_customer(&self, customer_id: &str) -> Result<Customer, CustomerError>;

    /// Apply a partial update; a supplied password is re-hashed.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `AlreadyExists` - A changed unique field collides with another customer
    /// * `DatabaseError` - Database operation failed
    async fn update_customer(
        &self,
        customer_id: &str,
        command: UpdateCustomerCommand,
    ) -> Result<Customer, CustomerError>;

    /// Delete a customer.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_customer(&self, customer_id: &str) -> Result<(), CustomerError>;
}

/// Gateway over the customer document collection.
///
/// Implementations enforce uniqueness of customerId, email and phoneNo and
/// report a collision as `AlreadyExists`.
#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    async fn find_one(&self, filter: &CustomerFilter) -> Result<Option<Customer>, CustomerError>;

    async fn insert_one(&self, customer: Customer) -> Result<Customer, CustomerError>;

    /// Apply `patch` to the customer stored under `customer_id` and return the result.
    ///
    /// # Errors
    /// * `NotFound` - No customer with this customerId
    async fn update_one(
        &self,
        customer_id: &str,
        patch: CustomerPatch,
    ) -> Result<Customer, CustomerError>;

    /// # Errors
    /// * `NotFound` - No customer with this customerId
    async fn delete_one(&self, customer_id: &str) -> Result<(), CustomerError>;
}
