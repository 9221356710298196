//! Store traits and error types.
//!
//! One trait per external store. Both are read-only: the backend never writes.

pub mod error;
pub mod graph;
pub mod orders;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use graph::RouteGraphStore;
pub use orders::OrderStore;
