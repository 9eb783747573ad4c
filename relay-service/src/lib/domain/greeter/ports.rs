use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::greeter::errors::RelayError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumResult {
    pub result: i64,
}

/// Remote greeter service.
#[async_trait]
pub trait GreeterPort: Send + Sync + 'static {
    /// # Errors
    /// * `Unavailable` - Transport failure or timeout
    /// * `UpstreamStatus` - Non-success HTTP status
    /// * `InvalidResponse` - Body is not a greeting
    async fn greet(&self, name: &str) -> Result<Greeting, RelayError>;

    async fn sum(&self, a: i64, b: i64) -> Result<SumResult, RelayError>;
}
