use std::sync::Arc;

use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserStore;
use account_service::outbound::repositories::PostgresUserStore;
use auth::AuthGate;
use auth::PasswordHasher;
use auth::TokenService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_lifetime_seconds = config.jwt.expiration_seconds,
        argon2_memory_kib = config.password.memory_kib,
        argon2_iterations = config.password.iterations,
        store = if config.database.is_some() { "postgresql" } else { "memory" },
        "Configuration loaded"
    );

    let password_hasher = Arc::new(PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?);
    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::seconds(config.jwt.expiration_seconds),
    ));

    let account_service: Arc<dyn AccountServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(
                Arc::new(PostgresUserStore::new(pg_pool)),
                Arc::clone(&password_hasher),
                Arc::clone(&token_service),
            )?)
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            Arc::new(AccountService::new(
                Arc::new(InMemoryUserStore::new()),
                Arc::clone(&password_hasher),
                Arc::clone(&token_service),
            )?)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, AuthGate::new(token_service));

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
