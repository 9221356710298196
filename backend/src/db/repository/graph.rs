//! Graph store trait for airport and route queries.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Airport, AirportConnections, LongestRoute};

/// Read access to `Airport` nodes and `CONNECTED_TO` relationships.
#[async_trait]
pub trait RouteGraphStore: Send + Sync {
    /// Verify the store answers.
    async fn ping(&self) -> RepositoryResult<()>;

    /// Directed routes with `distance_km > 1000` and a known flight time.
    ///
    /// Rows are sorted by `distance_km` descending before truncation to `limit`,
    /// so the result is the `limit` longest qualifying routes.
    async fn longest_routes(&self, limit: usize) -> RepositoryResult<Vec<LongestRoute>>;

    /// Distinct neighbor count for the airport with `airport_code`,
    /// following relationships in either direction.
    ///
    /// An unknown code yields no rows rather than an error.
    async fn airport_connections(
        &self,
        airport_code: &str,
    ) -> RepositoryResult<Vec<AirportConnections>>;

    /// Distinct `(code, city)` pairs ordered by code.
    async fn list_airports(&self) -> RepositoryResult<Vec<Airport>>;

    /// Release driver resources. Called once by the connection provider.
    async fn close(&self) {}
}
