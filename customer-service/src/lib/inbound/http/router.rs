use std::sync::Arc;
use std::time::Duration;

use auth::AuthGate;
use auth::Authenticator;
use auth::Clock;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_customer::create_customer;
use super::handlers::delete_customer::delete_customer;
use super::handlers::get_customer::get_customer;
use super::handlers::login::login;
use super::handlers::update_customer::update_customer;
use super::middleware::authenticate as auth_middleware;
use crate::domain::customer::ports::CustomerServicePort;

/// Process-wide context shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub customer_service: Arc<dyn CustomerServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub gate: AuthGate,
    pub clock: Arc<dyn Clock>,
}

pub fn create_router(
    customer_service: Arc<dyn CustomerServicePort>,
    authenticator: Arc<Authenticator>,
    clock: Arc<dyn Clock>,
) -> Router {
    let state = AppState {
        customer_service,
        gate: authenticator.gate(),
        authenticator,
        clock,
    };

    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/customer/save", post(create_customer));

    let protected_routes = Router::new()
        .route("/customer/getById/:customer_id", get(get_customer))
        .route("/customer/update/:customer_id", patch(update_customer))
        .route("/customer/delete/:customer_id", delete(delete_customer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span; they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
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
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
