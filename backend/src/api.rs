//! Public API surface for the Rust backend.
//!
//! This file consolidates the row types and query outcome types served to the
//! presentation layer. All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::airports::Airport;
pub use crate::routes::airports::AirportConnections;
pub use crate::routes::combined::CombinedRoute;
pub use crate::routes::longest::LongestRoute;
pub use crate::routes::profitable::ProfitableRoute;
pub use crate::routes::profitable::RouteMargin;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Route key shared by both stores: `(origin, destination)` airport codes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub origin: String,
    pub destination: String,
}

impl RouteKey {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}

/// The external store a query or connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Order and price-reference collections.
    Document,
    /// Airport nodes and route edges.
    Graph,
}

impl StoreKind {
    pub fn label(&self) -> &'static str {
        match self {
            StoreKind::Document => "document store",
            StoreKind::Graph => "graph store",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reason attached to an empty or short-circuited query outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The store could not be reached when the provider first connected.
    ConnectionUnavailable { store: StoreKind, message: String },
    /// The store accepted the connection but the query failed.
    QueryFailed { store: StoreKind, message: String },
    /// The combined analysis found no long routes in the graph store.
    NoGraphRoutes,
    /// The combined analysis found no profitable routes in the document store.
    NoProfitableRoutes,
}

impl Notice {
    /// Failures, as opposed to the combined analysis' empty-side warnings.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notice::ConnectionUnavailable { .. } | Notice::QueryFailed { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ConnectionUnavailable { store, message } => {
                write!(f, "{} connection unavailable: {}", store, message)
            }
            Notice::QueryFailed { store, message } => {
                write!(f, "{} query failed: {}", store, message)
            }
            Notice::NoGraphRoutes => f.write_str("no long routes found in the graph store"),
            Notice::NoProfitableRoutes => {
                f.write_str("no profitable routes found in the document store for the order window")
            }
        }
    }
}

/// Result of a query function: the rows, plus an optional notice.
///
/// Rows are empty whenever a notice is present. Zero rows with no notice is a
/// legitimate empty result, so callers only need a single empty-state branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome<T> {
    pub rows: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notice: Option<Notice>,
}

impl<T> QueryOutcome<T> {
    pub fn rows(rows: Vec<T>) -> Self {
        Self { rows, notice: None }
    }

    pub fn empty(notice: Notice) -> Self {
        Self {
            rows: Vec::new(),
            notice: Some(notice),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        self.notice.as_ref().is_some_and(Notice::is_failure)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<T> Default for QueryOutcome<T> {
    fn default() -> Self {
        Self::rows(Vec::new())
    }
}
