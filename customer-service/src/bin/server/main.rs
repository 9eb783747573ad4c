use std::sync::Arc;

use anyhow::Context;
use auth::Authenticator;
use auth::Clock;
use auth::PasswordHasher;
use auth::SigningSecret;
use auth::SystemClock;
use customer_service::config::Config;
use customer_service::domain::customer::service::CustomerService;
use customer_service::inbound::http::router::create_router;
use customer_service::outbound::repositories::MongoCustomerRepository;
use mongodb::bson::doc;
use mongodb::Client;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "customer-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load().context("Failed to load configuration")?;

    tracing::info!(
        database_name = %config.database.name,
        collection = %config.database.collection,
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    let secret = SigningSecret::from_hex(&config.jwt.secret).context("Invalid jwt.secret")?;
    let password_hasher = PasswordHasher::with_cost(config.hashing.cost())?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let client = Client::with_uri_str(&config.database.url)
        .await
        .context("Failed to create MongoDB client")?;
    let database = client.database(&config.database.name);
    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB ping failed")?;
    tracing::info!(database = "mongodb", name = %config.database.name, "Database connected");

    let customer_repository = Arc::new(
        MongoCustomerRepository::new(&database, &config.database.collection).await?,
    );
    let customer_service = Arc::new(CustomerService::new(
        customer_repository,
        password_hasher.clone(),
    ));
    let authenticator = Arc::new(
        Authenticator::new(&secret, Arc::clone(&clock)).with_password_hasher(password_hasher),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(customer_service, authenticator, clock);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
