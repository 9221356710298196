//! Flight analytics HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # In-memory stores, optionally seeded from a fixture
//! LOCAL_FIXTURE=data/sample.json cargo run --bin flight-analytics-server
//!
//! # Live stores
//! MONGO_URI=mongodb://localhost:27017/ NEO4J_URI=bolt://localhost:7687 NEO4J_PASSWORD=secret \
//!   cargo run --bin flight-analytics-server --features live-repo
//! ```
//!
//! Settings come from `analytics.toml` when one is found in the standard
//! locations, otherwise from the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)
//! - `REPOSITORY_TYPE`, `MONGO_*`, `NEO4J_*`, `CACHE_*`, `LOCAL_FIXTURE`: see [`flight_analytics::db`]

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use flight_analytics::db::{CacheConfig, ConnectionProvider, RepositoryConfig, RepositoryFactory};
use flight_analytics::http::{create_router, AppState};
use flight_analytics::services::{AnalyticsService, StatusBoard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting flight analytics server");

    let (connector, cache) = match RepositoryConfig::from_default_location() {
        Ok(config) => {
            info!("Using analytics.toml");
            (
                RepositoryFactory::from_repository_config(&config)?,
                config.cache_config(),
            )
        }
        Err(_) => (RepositoryFactory::from_env()?, CacheConfig::from_env()),
    };

    let provider = Arc::new(ConnectionProvider::new(connector, StatusBoard::new()));
    let analytics = Arc::new(AnalyticsService::new(provider, &cache));
    if !analytics.connect().await {
        warn!("Starting with at least one store unavailable; affected views will be empty");
    }

    let app = create_router(AppState::new(Arc::clone(&analytics)));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid HOST/PORT")?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    analytics.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
