use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::call_greet::call_greet;
use super::handlers::call_sum::call_sum;
use crate::greeter::ports::GreeterPort;

#[derive(Clone)]
pub struct AppState {
    pub greeter: Arc<dyn GreeterPort>,
}

pub fn create_router(greeter: Arc<dyn GreeterPort>) -> Router {
    let state = AppState { greeter };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/call-greet/:name", get(call_greet))
        .route("/call-sum", post(call_sum))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
