use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetResponse {
    pub message: String,
}

pub async fn greet(Path(name): Path<String>) -> Json<GreetResponse> {
    tracing::debug!(name = %name, "Greeting");
    Json(GreetResponse {
        message: format!("Hello, {}", name),
    })
}
