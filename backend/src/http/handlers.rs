//! HTTP handlers for the REST API.
//!
//! Each handler validates its parameters and delegates to the
//! [`AnalyticsService`](crate::services::AnalyticsService).

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use super::dto::{
    Airport, AirportConnections, CombinedQuery, CombinedRoute, HealthResponse, LimitQuery,
    LongestRoute, ProfitableRoute, RowsResponse, StatusResponse, StoreHealth,
    DEFAULT_COMBINED_LONGEST, DEFAULT_COMBINED_PROFITABLE, DEFAULT_LONGEST_LIMIT,
    DEFAULT_PROFITABLE_LIMIT, MAX_LIMIT,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::StoreKind;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Resolve an optional limit against its default and the accepted range.
fn limit(name: &str, value: Option<usize>, default: usize) -> Result<usize, AppError> {
    let value = value.unwrap_or(default);
    if (1..=MAX_LIMIT).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::BadRequest(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_LIMIT, value
        )))
    }
}

// =============================================================================
// Health and status
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let stores = StoreHealth {
        document: state.analytics.connection_state(StoreKind::Document),
        graph: state.analytics.connection_state(StoreKind::Graph),
    };
    let status = if stores.document.is_connected() && stores.graph.is_connected() {
        "ok"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: "v1".to_string(),
        stores,
    }))
}

/// GET /v1/status
///
/// Connection messages, combined-analysis warnings and query errors.
pub async fn get_status(State(state): State<AppState>) -> HandlerResult<StatusResponse> {
    Ok(Json(StatusResponse {
        entries: state.analytics.status().entries(),
    }))
}

// =============================================================================
// Route analytics
// =============================================================================

/// GET /v1/routes/profitable?limit=
pub async fn get_profitable_routes(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> HandlerResult<RowsResponse<ProfitableRoute>> {
    let Query(query) = query?;
    let n = limit("limit", query.limit, DEFAULT_PROFITABLE_LIMIT)?;
    let outcome = state.analytics.get_top_profitable_routes(n).await;
    Ok(Json(outcome.into()))
}

/// GET /v1/routes/longest?limit=
pub async fn get_longest_routes(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> HandlerResult<RowsResponse<LongestRoute>> {
    let Query(query) = query?;
    let n = limit("limit", query.limit, DEFAULT_LONGEST_LIMIT)?;
    let outcome = state.analytics.get_longest_routes(n).await;
    Ok(Json(outcome.into()))
}

/// GET /v1/routes/combined?longest=&profitable=
pub async fn get_combined_analysis(
    State(state): State<AppState>,
    query: Result<Query<CombinedQuery>, QueryRejection>,
) -> HandlerResult<RowsResponse<CombinedRoute>> {
    let Query(query) = query?;
    let n_longest = limit("longest", query.longest, DEFAULT_COMBINED_LONGEST)?;
    let n_profitable = limit("profitable", query.profitable, DEFAULT_COMBINED_PROFITABLE)?;
    let outcome = state
        .analytics
        .get_combined_analysis(n_longest, n_profitable)
        .await;
    Ok(Json(outcome.into()))
}

// =============================================================================
// Airports
// =============================================================================

/// GET /v1/airports
pub async fn list_airports(State(state): State<AppState>) -> HandlerResult<RowsResponse<Airport>> {
    let outcome = state.analytics.list_airports().await;
    Ok(Json(outcome.into()))
}

/// GET /v1/airports/{code}/connections
///
/// An unknown code yields zero rows, not 404.
pub async fn get_airport_connections(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> HandlerResult<RowsResponse<AirportConnections>> {
    if code.trim().is_empty() {
        return Err(AppError::BadRequest("airport code must not be empty".to_string()));
    }
    let outcome = state.analytics.get_airport_connections(&code).await;
    Ok(Json(outcome.into()))
}
