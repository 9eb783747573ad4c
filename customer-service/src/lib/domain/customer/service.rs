use std::sync::Arc;

use async_trait::async_trait;

use crate::customer::errors::CustomerError;
use crate::customer::ports::CustomerRepository;
use crate::customer::ports::CustomerServicePort;
use crate::domain::customer::models::CreateCustomerCommand;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerFilter;
use crate::domain::customer::models::CustomerPatch;
use crate::domain::customer::models::Password;
use crate::domain::customer::models::UpdateCustomerCommand;

/// Domain service implementation for customer operations.
pub struct CustomerService<R>
where
    R: CustomerRepository,
{
    repository: Arc<R>,
    password_hasher: auth::PasswordHasher,
}

impl<R> CustomerService<R>
where
    R: CustomerRepository,
{
    /// Create a new customer service.
    ///
    /// # Arguments
    /// * `repository` - Customer persistence implementation
    /// * `password_hasher` - Hasher used for new and changed passwords
    pub fn new(repository: Arc<R>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Hash on the blocking pool; Argon2 would otherwise stall the executor.
    async fn hash_password(&self, password: Password) -> Result<String, CustomerError> {
        let hasher = self.password_hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| CustomerError::Unknown(format!("Hashing task failed: {}", e)))??;
        Ok(hash)
    }

    /// Fail with `AlreadyExists` if another customer holds this unique value.
    async fn ensure_available(
        &self,
        filter: CustomerFilter,
        owner: Option<&str>,
    ) -> Result<(), CustomerError> {
        match self.repository.find_one(&filter).await? {
            Some(existing) if Some(existing.customer_id.as_str()) != owner => {
                Err(CustomerError::AlreadyExists {
                    field: filter.field(),
                    value: filter.value().to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> CustomerServicePort for CustomerService<R>
where
    R: CustomerRepository,
{
    async fn create_customer(
        &self,
        command: CreateCustomerCommand,
    ) -> Result<Customer, CustomerError> {
        self.ensure_available(
            CustomerFilter::CustomerId(command.customer_id.to_string()),
            None,
        )
        .await?;
        self.ensure_available(CustomerFilter::Email(command.email.to_string()), None)
            .await?;
        self.ensure_available(CustomerFilter::PhoneNo(command.phone_no.to_string()), None)
            .await?;

        let password_hash = self.hash_password(command.password).await?;

        let customer = Customer {
            customer_id: command.customer_id,
            name: command.name,
            age: command.age,
            email: command.email,
            phone_no: command.phone_no,
            address: command.address,
            password_hash,
            cards: command.cards,
        };

        let created = self.repository.insert_one(customer).await?;
        tracing::info!(customer_id = %created.customer_id, "Customer created");

        Ok(created)
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Customer, CustomerError> {
        self.repository
            .find_one(&CustomerFilter::CustomerId(customer_id.to_string()))
            .await?
            .ok_or_else(|| CustomerError::NotFound(customer_id.to_string()))
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        command: UpdateCustomerCommand,
    ) -> Result<Customer, CustomerError> {
        let current = self.get_customer(customer_id).await?;

        if let Some(new_id) = &command.customer_id {
            if new_id != &current.customer_id {
                self.ensure_available(CustomerFilter::CustomerId(new_id.to_string()), None)
                    .await?;
            }
        }
        if let Some(email) = &command.email {
            self.ensure_available(CustomerFilter::Email(email.to_string()), Some(customer_id))
                .await?;
        }
        if let Some(phone_no) = &command.phone_no {
            self.ensure_available(
                CustomerFilter::PhoneNo(phone_no.to_string()),
                Some(customer_id),
            )
            .await?;
        }

        let password_hash = match command.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let patch = CustomerPatch {
            customer_id: command.customer_id,
            name: command.name,
            age: command.age,
            email: command.email,
            phone_no: command.phone_no,
            address: command.address,
            password_hash,
        };

        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self.repository.update_one(customer_id, patch).await?;
        tracing::info!(
            customer_id = %customer_id,
            new_customer_id = %updated.customer_id,
            "Customer updated"
        );

        Ok(updated)
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<(), CustomerError> {
        self.repository.delete_one(customer_id).await?;
        tracing::info!(customer_id = %customer_id, "Customer deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::customer::models::Address;
    use crate::domain::customer::models::Age;
    use crate::domain::customer::models::CustomerId;
    use crate::domain::customer::models::EmailAddress;
    use crate::domain::customer::models::PersonName;
    use crate::domain::customer::models::PhoneNumber;

    mock! {
        pub TestCustomerRepository {}

        #[async_trait]
        impl CustomerRepository for TestCustomerRepository {
            async fn find_one(&self, filter: &CustomerFilter) -> Result<Option<Customer>, CustomerError>;
            async fn insert_one(&self, customer: Customer) -> Result<Customer, CustomerError>;
            async fn update_one(&self, customer_id: &str, patch: CustomerPatch) -> Result<Customer, CustomerError>;
            async fn delete_one(&self, customer_id: &str) -> Result<(), CustomerError>;
        }
    }

    fn fast_hasher() -> auth::PasswordHasher {
        auth::PasswordHasher::with_cost(auth::HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn customer(customer_id: &str, email: &str, phone_no: &str) -> Customer {
        Customer {
            customer_id: CustomerId::new(customer_id).unwrap(),
            name: PersonName::new("John Doe").unwrap(),
            age: Age::new(30).unwrap(),
            email: EmailAddress::new(email).unwrap(),
            phone_no: PhoneNumber::new(phone_no).unwrap(),
            address: Address::new("12 Main Street").unwrap(),
            password_hash: "$argon2id$stored".to_string(),
            cards: Vec::new(),
        }
    }

    fn create_command(customer_id: &str, email: &str) -> CreateCustomerCommand {
        CreateCustomerCommand {
            customer_id: CustomerId::new(customer_id).unwrap(),
            name: PersonName::new("John Doe").unwrap(),
            age: Age::new(30).unwrap(),
            email: EmailAddress::new(email).unwrap(),
            phone_no: PhoneNumber::new("9876543210").unwrap(),
            address: Address::new("12 Main Street").unwrap(),
            password: Password::new("Secure@Pass1").unwrap(),
            cards: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_customer_success() {
        let mut repository = MockTestCustomerRepository::new();

        repository
            .expect_find_one()
            .times(3)
            .returning(|_| Ok(None));
        repository
            .expect_insert_one()
            .withf(|customer| {
                customer.customer_id.as_str() == "john.doe123"
                    && customer.password_hash.starts_with("$argon2id$")
                    && !customer.password_hash.contains("Secure@Pass1")
            })
            .times(1)
            .returning(Ok);

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let created = service
            .create_customer(create_command("john.doe123", "john@example.com"))
            .await
            .unwrap();

        assert_eq!(created.customer_id.as_str(), "john.doe123");
        assert!(fast_hasher()
            .verify("Secure@Pass1", &created.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_customer_duplicate_id() {
        let mut repository = MockTestCustomerRepository::new();

        repository
            .expect_find_one()
            .with(eq(CustomerFilter::CustomerId("john.doe123".to_string())))
            .times(1)
            .returning(|_| {
                Ok(Some(customer(
                    "john.doe123",
                    "john@example.com",
                    "9876543210",
                )))
            });
        repository.expect_insert_one().never();

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let result = service
            .create_customer(create_command("john.doe123", "other@example.com"))
            .await;

        match result {
            Err(CustomerError::AlreadyExists { field, value }) => {
                assert_eq!(field, "customerId");
                assert_eq!(value, "john.doe123");
            }
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_customer_duplicate_email() {
        let mut repository = MockTestCustomerRepository::new();

        repository.expect_find_one().returning(|filter| match filter {
            CustomerFilter::Email(_) => Ok(Some(customer(
                "jane.doe123",
                "john@example.com",
                "1234567890",
            ))),
            _ => Ok(None),
        });

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let result = service
            .create_customer(create_command("john.doe123", "john@example.com"))
            .await;

        assert!(matches!(
            result,
            Err(CustomerError::AlreadyExists { field: "email", .. })
        ));
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let mut repository = MockTestCustomerRepository::new();
        repository.expect_find_one().times(1).returning(|_| Ok(None));

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let result = service.get_customer("nobody.here").await;
        assert!(matches!(result, Err(CustomerError::NotFound(id)) if id == "nobody.here"));
    }

    #[tokio::test]
    async fn test_update_customer_rehashes_password() {
        let mut repository = MockTestCustomerRepository::new();

        repository
            .expect_find_one()
            .times(1)
            .returning(|_| {
                Ok(Some(customer(
                    "john.doe123",
                    "john@example.com",
                    "9876543210",
                )))
            });
        repository
            .expect_update_one()
            .withf(|customer_id, patch| {
                customer_id == "john.doe123"
                    && patch.age == Some(Age::new(31).unwrap())
                    && patch
                        .password_hash
                        .as_deref()
                        .is_some_and(|hash| hash.starts_with("$argon2id$"))
                    && patch.name.is_none()
            })
            .times(1)
            .returning(|_, patch| {
                let mut updated = customer("john.doe123", "john@example.com", "9876543210");
                patch.apply_to(&mut updated);
                Ok(updated)
            });

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let command = UpdateCustomerCommand {
            age: Some(Age::new(31).unwrap()),
            password: Some(Password::new("Newer@Pass2").unwrap()),
            ..Default::default()
        };

        let updated = service.update_customer("john.doe123", command).await.unwrap();
        assert_eq!(updated.age.get(), 31);
        assert!(fast_hasher()
            .verify("Newer@Pass2", &updated.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_update_customer_email_taken_by_other() {
        let mut repository = MockTestCustomerRepository::new();

        repository.expect_find_one().returning(|filter| match filter {
            CustomerFilter::CustomerId(_) => Ok(Some(customer(
                "john.doe123",
                "john@example.com",
                "9876543210",
            ))),
            CustomerFilter::Email(_) => Ok(Some(customer(
                "jane.doe123",
                "jane@example.com",
                "1234567890",
            ))),
            CustomerFilter::PhoneNo(_) => Ok(None),
        });
        repository.expect_update_one().never();

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let command = UpdateCustomerCommand {
            email: Some(EmailAddress::new("jane@example.com").unwrap()),
            ..Default::default()
        };

        let result = service.update_customer("john.doe123", command).await;
        assert!(matches!(
            result,
            Err(CustomerError::AlreadyExists { field: "email", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_customer_keeping_own_email() {
        let mut repository = MockTestCustomerRepository::new();

        repository.expect_find_one().returning(|_| {
            Ok(Some(customer(
                "john.doe123",
                "john@example.com",
                "9876543210",
            )))
        });
        repository
            .expect_update_one()
            .times(1)
            .returning(|_, patch| {
                let mut updated = customer("john.doe123", "john@example.com", "9876543210");
                patch.apply_to(&mut updated);
                Ok(updated)
            });

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let command = UpdateCustomerCommand {
            email: Some(EmailAddress::new("john@example.com").unwrap()),
            name: Some(PersonName::new("Johnny").unwrap()),
            ..Default::default()
        };

        let updated = service.update_customer("john.doe123", command).await.unwrap();
        assert_eq!(updated.name.as_str(), "Johnny");
    }

    #[tokio::test]
    async fn test_update_customer_not_found() {
        let mut repository = MockTestCustomerRepository::new();
        repository.expect_find_one().times(1).returning(|_| Ok(None));
        repository.expect_update_one().never();

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let command = UpdateCustomerCommand {
            age: Some(Age::new(40).unwrap()),
            ..Default::default()
        };

        let result = service.update_customer("nobody.here", command).await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_update_returns_current() {
        let mut repository = MockTestCustomerRepository::new();
        repository.expect_find_one().times(1).returning(|_| {
            Ok(Some(customer(
                "john.doe123",
                "john@example.com",
                "9876543210",
            )))
        });
        repository.expect_update_one().never();

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let result = service
            .update_customer("john.doe123", UpdateCustomerCommand::default())
            .await
            .unwrap();
        assert_eq!(result.customer_id.as_str(), "john.doe123");
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_delete_one()
            .with(eq("john.doe123"))
            .times(1)
            .returning(|_| Ok(()));

        let service = CustomerService::new(Arc::new(repository), fast_hasher());
        assert!(service.delete_customer("john.doe123").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_customer_not_found() {
        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_delete_one()
            .times(1)
            .returning(|id| Err(CustomerError::NotFound(id.to_string())));

        let service = CustomerService::new(Arc::new(repository), fast_hasher());

        let result = service.delete_customer("nobody.here").await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }
}
