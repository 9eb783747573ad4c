use std::sync::Arc;

use relay_service::config::Config;
use relay_service::inbound::http::router::create_router;
use relay_service::outbound::greeter::HttpGreeterClient;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "relay-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        greeter_url = %config.greeter.base_url,
        greeter_timeout_ms = config.greeter.timeout_ms,
        "Configuration loaded"
    );

    let greeter = Arc::new(HttpGreeterClient::new(
        &config.greeter.base_url,
        config.greeter.timeout(),
    )?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(greeter)).await?;

    Ok(())
}
