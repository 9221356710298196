//! Data access for the flight analytics backend.
//!
//! Two read-only stores feed the dashboard:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Query services (services::analytics) + result cache    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ConnectionProvider - one lazy handle per store         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Store traits (repository/) - OrderStore, RouteGraphStore│
//! └──────────┬─────────────────────────────┬────────────────┘
//!            │                             │
//!   ┌────────▼─────────┐         ┌─────────▼────────┐
//!   │ MongoOrderStore  │         │ Neo4jGraphStore  │   (live)
//!   │ LocalOrderStore  │         │ LocalGraphStore  │   (in-memory)
//!   └──────────────────┘         └──────────────────┘
//! ```
//!
//! The `factory` selects the implementation from the environment or an
//! `analytics.toml` file.

#[cfg(not(any(
    feature = "mongo-repo",
    feature = "neo4j-repo",
    feature = "local-repo"
)))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod connection;
pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use config::{CacheConfig, MongoConfig, Neo4jConfig};
pub use connection::{ConnectionProvider, ConnectionState, StoreConnector};
pub use factory::{LiveConnector, LocalConnector, RepositoryFactory, RepositoryType};
pub use models::OrderWindow;
pub use repo_config::RepositoryConfig;
pub use repositories::{LocalDataset, LocalGraphStore, LocalOrderStore};
#[cfg(feature = "mongo-repo")]
pub use repositories::MongoOrderStore;
#[cfg(feature = "neo4j-repo")]
pub use repositories::Neo4jGraphStore;
pub use repository::{
    ErrorContext, OrderStore, RepositoryError, RepositoryResult, RouteGraphStore,
};
