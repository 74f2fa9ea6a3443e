//! Holistic profile service entry point.

use std::sync::Arc;

use holistic_profile::adapters::auth::{JwtConfig, JwtSessionValidator};
use holistic_profile::adapters::http::AuthState;
use holistic_profile::adapters::postgres::{PostgresPersonalDataReader, PostgresProfileRepository};
use holistic_profile::adapters::storage::InMemoryProfileStore;
use holistic_profile::app::{build_app, AppPorts};
use holistic_profile::config::{AppConfig, DatabaseConfig, ServerConfig};
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}

async fn data_ports(
    database: &DatabaseConfig,
    sessions: AuthState,
) -> Result<AppPorts, Box<dyn std::error::Error>> {
    let Some(url) = database.url.as_deref().filter(|url| !url.is_empty()) else {
        tracing::warn!("no database configured, serving from the in-memory store");
        let store = Arc::new(InMemoryProfileStore::new());
        return Ok(AppPorts {
            profiles: store.clone(),
            personal_data: store,
            sessions,
        });
    };

    let pool = database.pool_options().connect(url).await?;
    tracing::info!(
        max_connections = database.max_connections,
        "connected to PostgreSQL"
    );

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    Ok(AppPorts {
        profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
        personal_data: Arc::new(PostgresPersonalDataReader::new(pool)),
        sessions,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let sessions: AuthState = Arc::new(JwtSessionValidator::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
    )));

    let ports = data_ports(&config.database, sessions).await?;
    let app = build_app(ports, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "holistic profile service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
