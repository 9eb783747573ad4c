use std::sync::Arc;

use auth::Authenticator;
use auth::Clock;
use auth::HashingCost;
use auth::PasswordHasher;
use auth::SigningSecret;
use auth::SystemClock;
use customer_service::domain::customer::service::CustomerService;
use customer_service::inbound::http::router::create_router;
use customer_service::outbound::repositories::InMemoryCustomerRepository;
use serde_json::json;
use serde_json::Value;

/// Test application that spawns a real server on the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub secret: SigningSecret,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secret = SigningSecret::generate();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // Cheap Argon2 parameters keep the suite fast
        let password_hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let repository = Arc::new(InMemoryCustomerRepository::new());
        let customer_service = Arc::new(CustomerService::new(repository, password_hasher.clone()));
        let authenticator = Arc::new(
            Authenticator::new(&secret, Arc::clone(&clock)).with_password_hasher(password_hasher),
        );

        let router = create_router(customer_service, authenticator, clock);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            secret,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Create a customer and return the response
    pub async fn create_customer(&self, body: &Value) -> reqwest::Response {
        self.post("/customer/save")
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the access token
    pub async fn login(&self, customer_id: &str, password: &str) -> String {
        let response = self
            .post("/login")
            .form(&[("username", customer_id), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("Missing access_token")
            .to_string()
    }
}

/// A valid customer payload
pub fn customer_payload(customer_id: &str, email: &str, phone_no: &str) -> Value {
    json!({
        "customerId": customer_id,
        "name": "John Doe",
        "age": 30,
        "email": email,
        "phoneNo": phone_no,
        "address": "12 Main Street, Springfield",
        "password": "Secure@Pass1",
        "cards": [{
            "cardNumber": "4111111111111111",
            "cardType": "Visa",
            "expirationDate": "2099-12-31",
            "cvv": "123",
            "nameOnCard": "John Doe"
        }]
    })
}
