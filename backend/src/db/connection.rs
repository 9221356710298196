//! Lazily established, process-wide store connections.
//!
//! The [`ConnectionProvider`] asks its [`StoreConnector`] for each store at
//! most once. The outcome is kept for the life of the process: a store that
//! failed to connect stays unavailable and every query against it degrades
//! to an empty result instead of retrying. Each outcome is posted to the
//! status board.

use async_trait::async_trait;
use log::{error, info};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::api::StoreKind;
use crate::db::repository::{
    ErrorContext, OrderStore, RepositoryError, RepositoryResult, RouteGraphStore,
};
use crate::services::status::StatusBoard;

/// Opens store handles. Called at most once per store by the provider.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect_orders(&self) -> RepositoryResult<Arc<dyn OrderStore>>;

    async fn connect_graph(&self) -> RepositoryResult<Arc<dyn RouteGraphStore>>;
}

/// Observable state of one store's connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    NotAttempted,
    Connected,
    Unavailable { message: String },
    Closed,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

pub struct ConnectionProvider {
    connector: Arc<dyn StoreConnector>,
    status: StatusBoard,
    orders: OnceCell<RepositoryResult<Arc<dyn OrderStore>>>,
    graph: OnceCell<RepositoryResult<Arc<dyn RouteGraphStore>>>,
    closed: AtomicBool,
}

impl ConnectionProvider {
    pub fn new(connector: Arc<dyn StoreConnector>, status: StatusBoard) -> Self {
        Self {
            connector,
            status,
            orders: OnceCell::new(),
            graph: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// The document store handle, connecting on first use.
    pub async fn order_store(&self) -> RepositoryResult<Arc<dyn OrderStore>> {
        self.ensure_open(StoreKind::Document)?;
        self.orders
            .get_or_init(|| async {
                let attempt = async {
                    let store = self.connector.connect_orders().await?;
                    store.ping().await?;
                    Ok::<_, RepositoryError>(store)
                }
                .await;
                self.report(StoreKind::Document, attempt)
            })
            .await
            .clone()
    }

    /// The graph store handle, connecting on first use.
    pub async fn graph_store(&self) -> RepositoryResult<Arc<dyn RouteGraphStore>> {
        self.ensure_open(StoreKind::Graph)?;
        self.graph
            .get_or_init(|| async {
                let attempt = async {
                    let store = self.connector.connect_graph().await?;
                    store.ping().await?;
                    Ok::<_, RepositoryError>(store)
                }
                .await;
                self.report(StoreKind::Graph, attempt)
            })
            .await
            .clone()
    }

    /// Establish both connections up front. Returns true when both are up.
    pub async fn connect(&self) -> bool {
        let (orders, graph) = tokio::join!(self.order_store(), self.graph_store());
        orders.is_ok() && graph.is_ok()
    }

    pub fn state(&self, store: StoreKind) -> ConnectionState {
        if self.closed.load(Ordering::Acquire) {
            return ConnectionState::Closed;
        }
        let outcome = match store {
            StoreKind::Document => self.orders.get().map(|r| r.as_ref().map(|_| ())),
            StoreKind::Graph => self.graph.get().map(|r| r.as_ref().map(|_| ())),
        };
        match outcome {
            None => ConnectionState::NotAttempted,
            Some(Ok(())) => ConnectionState::Connected,
            Some(Err(e)) => ConnectionState::Unavailable {
                message: e.message().to_string(),
            },
        }
    }

    /// Release every established handle. Later calls report both stores as closed.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(Ok(store)) = self.orders.get() {
            store.close().await;
        }
        if let Some(Ok(store)) = self.graph.get() {
            store.close().await;
        }
        info!("Store connections closed");
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    fn ensure_open(&self, store: StoreKind) -> RepositoryResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RepositoryError::connection(store, "connection provider closed"));
        }
        Ok(())
    }

    fn report<T: ?Sized>(
        &self,
        store: StoreKind,
        attempt: RepositoryResult<Arc<T>>,
    ) -> RepositoryResult<Arc<T>> {
        match attempt {
            Ok(handle) => {
                info!("Connected to {}", store.label());
                self.status
                    .success(store, format!("Connected to {}", store.label()));
                Ok(handle)
            }
            Err(e) => {
                error!("Failed to connect to {}: {}", store.label(), e);
                self.status.error(
                    store,
                    format!("Failed to connect to {}: {}", store.label(), e.message()),
                );
                Err(as_unavailable(store, e))
            }
        }
    }
}

/// Any failure while connecting leaves the store unavailable.
fn as_unavailable(store: StoreKind, err: RepositoryError) -> RepositoryError {
    if err.is_connection_unavailable() {
        return err;
    }
    let mut context: ErrorContext = err.context().clone();
    if context.store.is_none() {
        context = context.with_store(store);
    }
    RepositoryError::connection_with_context(err.message(), context)
}
