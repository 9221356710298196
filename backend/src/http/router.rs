//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing).

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only API; any origin may fetch.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/status", get(handlers::get_status))
        .route("/routes/profitable", get(handlers::get_profitable_routes))
        .route("/routes/longest", get(handlers::get_longest_routes))
        .route("/routes/combined", get(handlers::get_combined_analysis))
        .route("/airports", get(handlers::list_airports))
        .route(
            "/airports/{code}/connections",
            get(handlers::get_airport_connections),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CacheConfig, ConnectionProvider, LocalDataset, RepositoryFactory};
    use crate::services::{AnalyticsService, StatusBoard};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let connector = RepositoryFactory::create_local(LocalDataset::default());
        let provider = Arc::new(ConnectionProvider::new(connector, StatusBoard::new()));
        let analytics = AnalyticsService::new(provider, &CacheConfig::default());
        let _router = create_router(AppState::new(Arc::new(analytics)));
    }
}
