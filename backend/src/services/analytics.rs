//! Dashboard query functions.
//!
//! Each function obtains its store from the [`ConnectionProvider`], consults
//! its memoization cache, and returns a [`QueryOutcome`]. Store failures never
//! propagate: they become an empty outcome with a notice plus a status-board
//! entry.

use log::{debug, error, warn};
use std::sync::Arc;

use crate::api::{
    Airport, AirportConnections, CombinedRoute, LongestRoute, Notice, ProfitableRoute,
    QueryOutcome, RouteMargin, StoreKind,
};
use crate::db::config::CacheConfig;
use crate::db::connection::{ConnectionProvider, ConnectionState};
use crate::db::models::OrderWindow;
use crate::db::repository::{OrderStore, RepositoryError, RepositoryResult, RouteGraphStore};
use crate::routes::airports::{GET_AIRPORT_CONNECTIONS, LIST_AIRPORTS};
use crate::routes::combined::GET_COMBINED_ANALYSIS;
use crate::routes::longest::GET_LONGEST_ROUTES;
use crate::routes::profitable::{GET_ROUTE_MARGINS, GET_TOP_PROFITABLE_ROUTES};

use super::cache::QueryCache;
use super::combine::combine_routes;
use super::status::StatusBoard;

type Rows<T> = Arc<Vec<T>>;

/// Query functions over the two stores, with their caches.
pub struct AnalyticsService {
    provider: Arc<ConnectionProvider>,
    status: StatusBoard,
    window: OrderWindow,
    profitable: QueryCache<usize, Rows<ProfitableRoute>>,
    margins: QueryCache<usize, Rows<RouteMargin>>,
    longest: QueryCache<usize, Rows<LongestRoute>>,
    combined: QueryCache<(usize, usize), Arc<QueryOutcome<CombinedRoute>>>,
    connections: QueryCache<String, Rows<AirportConnections>>,
    airports: QueryCache<(), Rows<Airport>>,
}

impl AnalyticsService {
    pub fn new(provider: Arc<ConnectionProvider>, cache: &CacheConfig) -> Self {
        Self {
            status: provider.status().clone(),
            provider,
            window: OrderWindow::default(),
            profitable: QueryCache::new(GET_TOP_PROFITABLE_ROUTES, cache),
            margins: QueryCache::new(GET_ROUTE_MARGINS, cache),
            longest: QueryCache::new(GET_LONGEST_ROUTES, cache),
            combined: QueryCache::new(GET_COMBINED_ANALYSIS, cache),
            connections: QueryCache::new(GET_AIRPORT_CONNECTIONS, cache),
            airports: QueryCache::new(LIST_AIRPORTS, cache),
        }
    }

    /// Use a different order window for the profitability queries.
    pub fn with_window(mut self, window: OrderWindow) -> Self {
        self.window = window;
        self
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn connection_state(&self, store: StoreKind) -> ConnectionState {
        self.provider.state(store)
    }

    /// Connect both stores up front.
    pub async fn connect(&self) -> bool {
        self.provider.connect().await
    }

    pub async fn close(&self) {
        self.provider.close().await;
    }

    /// Drop every memoized result.
    pub fn invalidate_caches(&self) {
        self.profitable.invalidate_all();
        self.margins.invalidate_all();
        self.longest.invalidate_all();
        self.combined.invalidate_all();
        self.connections.invalidate_all();
        self.airports.invalidate_all();
    }

    /// Top `n` routes by mean price difference over the order window.
    pub async fn get_top_profitable_routes(&self, n: usize) -> QueryOutcome<ProfitableRoute> {
        if n == 0 {
            return QueryOutcome::default();
        }
        let store = match self.provider.order_store().await {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Document, e),
        };

        let window = self.window;
        let result = self
            .profitable
            .get_or_fetch(n, async move {
                store.top_profitable_routes(&window, n).await.map(Arc::new)
            })
            .await;
        self.finish(GET_TOP_PROFITABLE_ROUTES, StoreKind::Document, result)
    }

    /// Top `n` route margins, without order totals.
    pub async fn get_route_margins(&self, n: usize) -> QueryOutcome<RouteMargin> {
        if n == 0 {
            return QueryOutcome::default();
        }
        let store = match self.provider.order_store().await {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Document, e),
        };

        let result = self.margin_rows(&store, n).await;
        self.finish(GET_ROUTE_MARGINS, StoreKind::Document, result)
    }

    /// Up to `n` routes longer than 1000 km, longest first.
    pub async fn get_longest_routes(&self, n: usize) -> QueryOutcome<LongestRoute> {
        if n == 0 {
            return QueryOutcome::default();
        }
        let store = match self.provider.graph_store().await {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Graph, e),
        };

        let result = self.longest_rows(&store, n).await;
        self.finish(GET_LONGEST_ROUTES, StoreKind::Graph, result)
    }

    /// Long routes joined with their profit margins.
    ///
    /// The document store is not queried when the graph store has no long
    /// routes.
    pub async fn get_combined_analysis(
        &self,
        n_longest: usize,
        n_profitable: usize,
    ) -> QueryOutcome<CombinedRoute> {
        if n_longest == 0 || n_profitable == 0 {
            return QueryOutcome::default();
        }
        let (graph, orders) =
            tokio::join!(self.provider.graph_store(), self.provider.order_store());
        let graph = match graph {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Graph, e),
        };
        let orders = match orders {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Document, e),
        };

        let result = self
            .combined
            .get_or_fetch((n_longest, n_profitable), async {
                let longest = self.longest_rows(&graph, n_longest).await?;
                if longest.is_empty() {
                    warn!("Combined analysis: no long routes in the graph store");
                    self.status.warning(Some(StoreKind::Graph), Notice::NoGraphRoutes.to_string());
                    return Ok(Arc::new(QueryOutcome::empty(Notice::NoGraphRoutes)));
                }

                let margins = self.margin_rows(&orders, n_profitable).await?;
                if margins.is_empty() {
                    warn!("Combined analysis: no profitable routes in the document store");
                    self.status.warning(
                        Some(StoreKind::Document),
                        Notice::NoProfitableRoutes.to_string(),
                    );
                    return Ok(Arc::new(QueryOutcome::empty(Notice::NoProfitableRoutes)));
                }

                let rows = combine_routes(&longest, &margins);
                debug!(
                    "Combined {} long routes with {} margins into {} rows",
                    longest.len(),
                    margins.len(),
                    rows.len()
                );
                Ok::<_, RepositoryError>(Arc::new(QueryOutcome::rows(rows)))
            })
            .await;

        match result {
            Ok(outcome) => outcome.as_ref().clone(),
            Err(e) => {
                let store = e.context().store.unwrap_or(StoreKind::Graph);
                self.report_failure(GET_COMBINED_ANALYSIS, store, &e);
                QueryOutcome::empty(e.to_notice(store))
            }
        }
    }

    /// Distinct connections of one airport, at most 10 rows.
    pub async fn get_airport_connections(&self, code: &str) -> QueryOutcome<AirportConnections> {
        let code = code.trim();
        if code.is_empty() {
            return QueryOutcome::default();
        }
        let store = match self.provider.graph_store().await {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Graph, e),
        };

        let key = code.to_string();
        let result = self
            .connections
            .get_or_fetch(key.clone(), async move {
                store.airport_connections(&key).await.map(Arc::new)
            })
            .await;
        self.finish(GET_AIRPORT_CONNECTIONS, StoreKind::Graph, result)
    }

    /// Every airport, ordered by code.
    pub async fn list_airports(&self) -> QueryOutcome<Airport> {
        let store = match self.provider.graph_store().await {
            Ok(store) => store,
            Err(e) => return unavailable(StoreKind::Graph, e),
        };

        let result = self
            .airports
            .get_or_fetch((), async move { store.list_airports().await.map(Arc::new) })
            .await;
        self.finish(LIST_AIRPORTS, StoreKind::Graph, result)
    }

    async fn longest_rows(
        &self,
        store: &Arc<dyn RouteGraphStore>,
        n: usize,
    ) -> RepositoryResult<Rows<LongestRoute>> {
        self.longest
            .get_or_fetch(n, async { store.longest_routes(n).await.map(Arc::new) })
            .await
    }

    async fn margin_rows(
        &self,
        store: &Arc<dyn OrderStore>,
        n: usize,
    ) -> RepositoryResult<Rows<RouteMargin>> {
        let window = self.window;
        self.margins
            .get_or_fetch(n, async move {
                store.top_route_margins(&window, n).await.map(Arc::new)
            })
            .await
    }

    fn finish<T: Clone>(
        &self,
        operation: &str,
        store: StoreKind,
        result: RepositoryResult<Rows<T>>,
    ) -> QueryOutcome<T> {
        match result {
            Ok(rows) => QueryOutcome::rows(rows.as_ref().clone()),
            Err(e) => {
                self.report_failure(operation, store, &e);
                QueryOutcome::empty(e.to_notice(store))
            }
        }
    }

    fn report_failure(&self, operation: &str, store: StoreKind, err: &RepositoryError) {
        error!("{} failed: {}", operation, err);
        self.status
            .error(store, format!("Error in {}: {}", operation, err.message()));
    }
}

/// The provider already reported the connection failure.
fn unavailable<T>(store: StoreKind, err: RepositoryError) -> QueryOutcome<T> {
    debug!("{} unavailable: {}", store.label(), err.message());
    QueryOutcome::empty(err.to_notice(store))
}
