use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use itinerary_api::app::{app, AppState};
use itinerary_api::auth::IdentityResolver;
use itinerary_api::config::{AppConfig, StoreBackend};
use itinerary_api::database::{DatabaseManager, MemoryTripStore, PgTripStore, TripStore};
use itinerary_api::services::ContentGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!(
        environment = ?config.environment,
        generation_mode = %config.generation.mode,
        store = ?config.database.backend,
        "starting itinerary API"
    );

    let store: Arc<dyn TripStore> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Arc::new(PgTripStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, data is lost on exit");
            Arc::new(MemoryTripStore::new())
        }
    };

    let generator = ContentGenerator::from_config(config.generation.mode, &config.llm)?;
    let state = AppState::new(IdentityResolver::new(&config.security), store, generator);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("itinerary API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
