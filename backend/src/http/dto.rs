//! Data Transfer Objects for the HTTP API.
//!
//! Row types are re-exported from the routes module since they already
//! derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    Airport, AirportConnections, CombinedRoute, LongestRoute, Notice, ProfitableRoute,
    QueryOutcome,
};
use crate::db::connection::ConnectionState;
use crate::services::status::StatusEntry;

pub const DEFAULT_PROFITABLE_LIMIT: usize = 10;
pub const DEFAULT_LONGEST_LIMIT: usize = 10;
pub const DEFAULT_COMBINED_LONGEST: usize = 30_000;
pub const DEFAULT_COMBINED_PROFITABLE: usize = 100;
/// Largest accepted row limit.
pub const MAX_LIMIT: usize = 50_000;

/// Query parameters for the single-limit route endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for the combined analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CombinedQuery {
    /// Cap on long routes considered
    #[serde(default)]
    pub longest: Option<usize>,
    /// Cap on profitable routes considered
    #[serde(default)]
    pub profitable: Option<usize>,
}

/// Rows of a query function plus its notice, rendered for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsResponse<T> {
    pub rows: Vec<T>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notice: Option<Notice>,
    /// Display text for the notice
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl<T> From<QueryOutcome<T>> for RowsResponse<T> {
    fn from(outcome: QueryOutcome<T>) -> Self {
        let message = outcome.notice.as_ref().map(ToString::to_string);
        Self {
            total: outcome.rows.len(),
            rows: outcome.rows,
            notice: outcome.notice,
            message,
        }
    }
}

/// Connection state of both stores.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub document: ConnectionState,
    pub graph: ConnectionState,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` when both stores are connected, `degraded` otherwise
    pub status: String,
    pub version: String,
    pub stores: StoreHealth,
}

/// Status board contents, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub entries: Vec<StatusEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_response_carries_notice_text() {
        let outcome: QueryOutcome<LongestRoute> = QueryOutcome::empty(Notice::NoGraphRoutes);
        let response = RowsResponse::from(outcome);
        assert_eq!(response.total, 0);
        assert_eq!(
            response.message.as_deref(),
            Some("no long routes found in the graph store")
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["notice"]["kind"], "no_graph_routes");
    }

    #[test]
    fn test_rows_response_without_notice() {
        let response = RowsResponse::from(QueryOutcome::rows(vec![1, 2, 3]));
        assert_eq!(response.total, 3);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("notice").is_none());
        assert!(json.get("message").is_none());
    }
}
