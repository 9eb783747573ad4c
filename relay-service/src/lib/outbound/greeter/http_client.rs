use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::greeter::errors::RelayError;
use crate::greeter::ports::GreeterPort;
use crate::greeter::ports::Greeting;
use crate::greeter::ports::SumResult;

/// Greeter client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpGreeterClient {
    client: Client,
    base_url: Url,
}

impl HttpGreeterClient {
    /// # Errors
    /// * `InvalidBaseUrl` - `base_url` is not an absolute http(s) URL
    /// * `Unavailable` - The HTTP client could not be built
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let base_url =
            Url::parse(base_url).map_err(|e| RelayError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RelayError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Unavailable(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RelayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RelayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RelayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GreeterPort for HttpGreeterClient {
    async fn greet(&self, name: &str) -> Result<Greeting, RelayError> {
        let url = self.endpoint(&["greet", name])?;
        tracing::debug!(url = %url, "Calling greeter");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::Unavailable(e.to_string()))?;

        Self::decode(response).await
    }

    async fn sum(&self, a: i64, b: i64) -> Result<SumResult, RelayError> {
        let url = self.endpoint(&["sum"])?;
        tracing::debug!(url = %url, a, b, "Calling greeter");

        let response = self
            .client
            .post(url)
            .json(&json!({ "a": a, "b": b }))
            .send()
            .await
            .map_err(|e| RelayError::Unavailable(e.to_string()))?;

        Self::decode(response).await
    }
}
