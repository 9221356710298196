//! Document store trait for order profitability aggregations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{ProfitableRoute, RouteMargin};
use crate::db::models::OrderWindow;

/// Read access to the `orders` and `flight_prices` collections.
///
/// Both aggregations share one pipeline shape:
/// 1. keep orders departing inside `window` whose `flight_id` is an int
/// 2. join each order to the price references with `id == flight_id`,
///    dropping orders without a match
/// 3. `price_diff = total_price - best_price`
/// 4. group by `(origin, destination)`
/// 5. sort by mean `price_diff` descending, then truncate to `limit`
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Verify the store answers.
    async fn ping(&self) -> RepositoryResult<()>;

    /// Top routes by mean price difference, with order count and revenue.
    ///
    /// # Arguments
    /// * `window` - Inclusive departure-date filter
    /// * `limit` - Maximum number of groups returned
    ///
    /// # Returns
    /// * `Ok(Vec<ProfitableRoute>)` - At most `limit` rows, `avg_diff` descending
    /// * `Err(RepositoryError)` - If the aggregation fails
    async fn top_profitable_routes(
        &self,
        window: &OrderWindow,
        limit: usize,
    ) -> RepositoryResult<Vec<ProfitableRoute>>;

    /// Same aggregation as [`OrderStore::top_profitable_routes`], projecting only
    /// the route and its mean price difference.
    async fn top_route_margins(
        &self,
        window: &OrderWindow,
        limit: usize,
    ) -> RepositoryResult<Vec<RouteMargin>>;

    /// Release driver resources. Called once by the connection provider.
    async fn close(&self) {}
}
