//! In-memory store implementations.
//!
//! These evaluate the same query semantics as the live stores over plain
//! vectors. They back unit tests and local development, and can be seeded
//! from a JSON fixture file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::{
    Airport, AirportConnections, LongestRoute, ProfitableRoute, RouteKey, RouteMargin, StoreKind,
};
use crate::db::models::{AirportNode, OrderRecord, OrderWindow, PriceReference, RouteEdge};
use crate::db::repository::{
    ErrorContext, OrderStore, RepositoryError, RepositoryResult, RouteGraphStore,
};
use crate::routes::airports::AIRPORT_CONNECTIONS_LIMIT;
use crate::routes::longest::LONG_ROUTE_MIN_DISTANCE_KM;

/// Contents of both stores, as loaded from a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalDataset {
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
    #[serde(default)]
    pub flight_prices: Vec<PriceReference>,
    #[serde(default)]
    pub airports: Vec<AirportNode>,
    #[serde(default)]
    pub routes: Vec<RouteEdge>,
}

impl LocalDataset {
    /// Load a dataset from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read fixture {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse fixture {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn order_store(&self) -> LocalOrderStore {
        LocalOrderStore::new(self.orders.clone(), self.flight_prices.clone())
    }

    pub fn graph_store(&self) -> LocalGraphStore {
        LocalGraphStore::new(self.airports.clone(), self.routes.clone())
    }
}

/// Failure injected into a local store.
#[derive(Debug, Clone)]
enum InjectedFailure {
    Unreachable(String),
    Query(String),
}

fn check_failure(
    failure: &Option<InjectedFailure>,
    store: StoreKind,
    operation: &str,
    pinging: bool,
) -> RepositoryResult<()> {
    match failure {
        Some(InjectedFailure::Unreachable(message)) => Err(RepositoryError::connection_with_context(
            message.clone(),
            ErrorContext::new(operation).with_store(store),
        )),
        Some(InjectedFailure::Query(message)) if !pinging => Err(RepositoryError::query_with_context(
            message.clone(),
            ErrorContext::new(operation).with_store(store),
        )),
        _ => Ok(()),
    }
}

// =============================================================================
// Document store
// =============================================================================

/// In-memory `orders` / `flight_prices` collections.
#[derive(Debug, Default)]
pub struct LocalOrderStore {
    orders: Vec<OrderRecord>,
    prices: Vec<PriceReference>,
    failure: Option<InjectedFailure>,
    queries: AtomicU64,
}

impl LocalOrderStore {
    pub fn new(orders: Vec<OrderRecord>, prices: Vec<PriceReference>) -> Self {
        Self {
            orders,
            prices,
            failure: None,
            queries: AtomicU64::new(0),
        }
    }

    /// A store whose ping fails, as if the server were down.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            failure: Some(InjectedFailure::Unreachable(message.into())),
            ..Default::default()
        }
    }

    /// A store that connects but fails every aggregation.
    pub fn with_query_error(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(InjectedFailure::Query(message.into()));
        self
    }

    /// Number of aggregations executed so far.
    pub fn queries_executed(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Grouped `(count, revenue, mean price_diff)` per route, sorted and truncated.
    fn aggregate(&self, window: &OrderWindow, limit: usize) -> Vec<ProfitableRoute> {
        let mut groups: HashMap<RouteKey, (i64, f64, f64)> = HashMap::new();

        let candidates = self.orders.iter().filter(|order| {
            window.contains(&order.depart_date)
                && order.flight_id.as_ref().is_some_and(|id| id.is_int())
        });

        for order in candidates {
            let Some(flight_id) = order.flight_id.as_ref().and_then(|id| id.as_number()) else {
                continue;
            };
            // lookup + unwind: one row per matching price reference
            for price in self.prices.iter().filter(|p| p.id as f64 == flight_id) {
                let entry = groups
                    .entry(RouteKey::new(order.origin.clone(), order.destination.clone()))
                    .or_insert((0, 0.0, 0.0));
                entry.0 += 1;
                entry.1 += order.total_price;
                entry.2 += order.total_price - price.best_price;
            }
        }

        let mut rows: Vec<ProfitableRoute> = groups
            .into_iter()
            .map(|(key, (count, revenue, diff_sum))| ProfitableRoute {
                origin: key.origin,
                destination: key.destination,
                total_order: count,
                total_revenue: revenue,
                avg_diff: diff_sum / count as f64,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.avg_diff
                .total_cmp(&a.avg_diff)
                .then_with(|| a.origin.cmp(&b.origin))
                .then_with(|| a.destination.cmp(&b.destination))
        });
        rows.truncate(limit);
        rows
    }
}

#[async_trait]
impl OrderStore for LocalOrderStore {
    async fn ping(&self) -> RepositoryResult<()> {
        check_failure(&self.failure, StoreKind::Document, "ping", true)
    }

    async fn top_profitable_routes(
        &self,
        window: &OrderWindow,
        limit: usize,
    ) -> RepositoryResult<Vec<ProfitableRoute>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        check_failure(
            &self.failure,
            StoreKind::Document,
            "top_profitable_routes",
            false,
        )?;
        Ok(self.aggregate(window, limit))
    }

    async fn top_route_margins(
        &self,
        window: &OrderWindow,
        limit: usize,
    ) -> RepositoryResult<Vec<RouteMargin>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        check_failure(&self.failure, StoreKind::Document, "top_route_margins", false)?;
        Ok(self
            .aggregate(window, limit)
            .into_iter()
            .map(RouteMargin::from)
            .collect())
    }
}

// =============================================================================
// Graph store
// =============================================================================

/// In-memory airport graph.
#[derive(Debug, Default)]
pub struct LocalGraphStore {
    airports: Vec<AirportNode>,
    routes: Vec<RouteEdge>,
    failure: Option<InjectedFailure>,
    queries: AtomicU64,
}

impl LocalGraphStore {
    pub fn new(airports: Vec<AirportNode>, routes: Vec<RouteEdge>) -> Self {
        Self {
            airports,
            routes,
            failure: None,
            queries: AtomicU64::new(0),
        }
    }

    /// A store whose ping fails, as if the server were down.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            failure: Some(InjectedFailure::Unreachable(message.into())),
            ..Default::default()
        }
    }

    /// A store that connects but fails every query.
    pub fn with_query_error(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(InjectedFailure::Query(message.into()));
        self
    }

    /// Number of queries executed so far.
    pub fn queries_executed(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Edges whose endpoints are both known airports.
    fn matched_edges(&self) -> impl Iterator<Item = &RouteEdge> {
        let codes: HashSet<&str> = self
            .airports
            .iter()
            .map(|a| a.airport_code.as_str())
            .collect();
        self.routes.iter().filter(move |edge| {
            codes.contains(edge.origin.as_str()) && codes.contains(edge.destination.as_str())
        })
    }

    fn begin(&self, operation: &str) -> RepositoryResult<()> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        check_failure(&self.failure, StoreKind::Graph, operation, false)
    }
}

#[async_trait]
impl RouteGraphStore for LocalGraphStore {
    async fn ping(&self) -> RepositoryResult<()> {
        check_failure(&self.failure, StoreKind::Graph, "ping", true)
    }

    async fn longest_routes(&self, limit: usize) -> RepositoryResult<Vec<LongestRoute>> {
        self.begin("longest_routes")?;

        let mut rows: Vec<LongestRoute> = self
            .matched_edges()
            .filter_map(|edge| {
                let distance_km = edge.distance_km.filter(|d| *d > LONG_ROUTE_MIN_DISTANCE_KM)?;
                let flight_time_hr = edge.flight_time_hr?;
                Some(LongestRoute {
                    origin: edge.origin.clone(),
                    destination: edge.destination.clone(),
                    distance_km,
                    flight_time_hr,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.distance_km.total_cmp(&a.distance_km));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn airport_connections(
        &self,
        airport_code: &str,
    ) -> RepositoryResult<Vec<AirportConnections>> {
        self.begin("airport_connections")?;

        let neighbors: HashSet<&str> = self
            .matched_edges()
            .filter_map(|edge| {
                if edge.origin == airport_code {
                    Some(edge.destination.as_str())
                } else if edge.destination == airport_code {
                    Some(edge.origin.as_str())
                } else {
                    None
                }
            })
            .collect();

        if neighbors.is_empty() {
            return Ok(Vec::new());
        }

        let cities: BTreeSet<&str> = self
            .airports
            .iter()
            .filter(|a| a.airport_code == airport_code)
            .map(|a| a.city.as_str())
            .collect();

        let mut rows: Vec<AirportConnections> = cities
            .into_iter()
            .map(|city| AirportConnections {
                airport: airport_code.to_string(),
                city: city.to_string(),
                total_connections: neighbors.len() as i64,
            })
            .collect();

        rows.sort_by(|a, b| b.total_connections.cmp(&a.total_connections));
        rows.truncate(AIRPORT_CONNECTIONS_LIMIT);
        Ok(rows)
    }

    async fn list_airports(&self) -> RepositoryResult<Vec<Airport>> {
        self.begin("list_airports")?;

        let distinct: BTreeSet<Airport> = self
            .airports
            .iter()
            .map(|a| Airport {
                code: a.airport_code.clone(),
                city: a.city.clone(),
            })
            .collect();
        Ok(distinct.into_iter().collect())
    }
}
