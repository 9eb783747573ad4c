use axum::extract::Path;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use crate::greeter::ports::Greeting;
use crate::inbound::http::router::AppState;

/// Relay a greeting request to the greeter service.
pub async fn call_greet(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Greeting>, ApiError> {
    state
        .greeter
        .greet(&name)
        .await
        .map(Json)
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;

    use super::*;
    use crate::greeter::errors::RelayError;
    use crate::inbound::http::handlers::tests::MockTestGreeter;

    #[tokio::test]
    async fn test_call_greet_relays_message() {
        let mut greeter = MockTestGreeter::new();
        greeter
            .expect_greet()
            .with(eq("Alice"))
            .times(1)
            .returning(|name| {
                Ok(Greeting {
                    message: format!("Hello, {}", name),
                })
            });

        let state = AppState {
            greeter: Arc::new(greeter),
        };

        let Json(greeting) = call_greet(State(state), Path("Alice".to_string()))
            .await
            .unwrap();
        assert_eq!(greeting.message, "Hello, Alice");
    }

    #[tokio::test]
    async fn test_call_greet_upstream_down() {
        let mut greeter = MockTestGreeter::new();
        greeter
            .expect_greet()
            .returning(|_| Err(RelayError::Unavailable("connection refused".to_string())));

        let state = AppState {
            greeter: Arc::new(greeter),
        };

        let result = call_greet(State(state), Path("Alice".to_string())).await;
        assert!(matches!(result, Err(ApiError::BadGateway(_))));
    }
}
