use std::sync::Arc;
use std::time::Duration;

use relay_service::inbound::http::router::create_router;
use relay_service::outbound::greeter::HttpGreeterClient;

/// Relay server wired to a greeter at `greeter_url`
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn a real greeter and a relay pointing at it
    pub async fn spawn() -> Self {
        let greeter_url = spawn_greeter().await;
        Self::spawn_with_greeter(&greeter_url).await
    }

    pub async fn spawn_with_greeter(greeter_url: &str) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

        let greeter = HttpGreeterClient::new(greeter_url, Duration::from_secs(2))
            .expect("Failed to build greeter client");
        let router = create_router(Arc::new(greeter));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}

/// Start greeter-service on a random port and return its base URL
pub async fn spawn_greeter() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    tokio::spawn(async move {
        axum::serve(listener, greeter_service::inbound::http::router::create_router())
            .await
            .expect("Server error");
    });

    address
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
