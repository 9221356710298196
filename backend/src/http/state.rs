//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::AnalyticsService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Query functions, caches and connection provider
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(analytics: Arc<AnalyticsService>) -> Self {
        Self { analytics }
    }
}
