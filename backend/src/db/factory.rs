//! Store connector factory for dependency injection.
//!
//! Selects between the in-memory stores and the live MongoDB/Neo4j stores
//! from the environment or a TOML configuration file, and hands back a
//! [`StoreConnector`] for the [`ConnectionProvider`](super::ConnectionProvider).

use async_trait::async_trait;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::{MongoConfig, Neo4jConfig};
use super::connection::StoreConnector;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalDataset;
use super::repository::{OrderStore, RepositoryError, RepositoryResult, RouteGraphStore};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory stores, optionally seeded from a fixture file
    Local,
    /// MongoDB document store plus Neo4j graph store
    Live,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "live").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "live" | "mongo-neo4j" => Ok(Self::Live),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to Live if either store
    /// URI is present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("MONGO_URI").is_ok() || std::env::var("NEO4J_URI").is_ok() {
            Self::Live
        } else {
            Self::Local
        }
    }
}

/// Hands out pre-built store handles.
pub struct LocalConnector {
    orders: Arc<dyn OrderStore>,
    graph: Arc<dyn RouteGraphStore>,
}

impl LocalConnector {
    pub fn new(orders: Arc<dyn OrderStore>, graph: Arc<dyn RouteGraphStore>) -> Self {
        Self { orders, graph }
    }

    pub fn from_dataset(dataset: &LocalDataset) -> Self {
        Self::new(
            Arc::new(dataset.order_store()),
            Arc::new(dataset.graph_store()),
        )
    }
}

#[async_trait]
impl StoreConnector for LocalConnector {
    async fn connect_orders(&self) -> RepositoryResult<Arc<dyn OrderStore>> {
        Ok(self.orders.clone())
    }

    async fn connect_graph(&self) -> RepositoryResult<Arc<dyn RouteGraphStore>> {
        Ok(self.graph.clone())
    }
}

/// Connects to MongoDB and Neo4j.
///
/// A store without configuration, or whose backend feature is disabled,
/// fails to connect and is reported unavailable.
#[derive(Debug, Clone, Default)]
pub struct LiveConnector {
    mongo: Option<MongoConfig>,
    neo4j: Option<Neo4jConfig>,
}

impl LiveConnector {
    pub fn new(mongo: Option<MongoConfig>, neo4j: Option<Neo4jConfig>) -> Self {
        Self { mongo, neo4j }
    }

    /// Read both store configurations from the environment.
    ///
    /// A store whose required variables are missing is left unconfigured.
    pub fn from_env() -> Self {
        let mongo = MongoConfig::from_env()
            .map_err(|e| log::warn!("Document store not configured: {}", e))
            .ok();
        let neo4j = Neo4jConfig::from_env()
            .map_err(|e| log::warn!("Graph store not configured: {}", e))
            .ok();
        Self::new(mongo, neo4j)
    }
}

#[async_trait]
impl StoreConnector for LiveConnector {
    async fn connect_orders(&self) -> RepositoryResult<Arc<dyn OrderStore>> {
        let config = self
            .mongo
            .clone()
            .ok_or_else(|| RepositoryError::configuration("MONGO_URI is not configured"))?;

        #[cfg(feature = "mongo-repo")]
        {
            let store = super::repositories::MongoOrderStore::connect(config).await?;
            Ok(Arc::new(store) as Arc<dyn OrderStore>)
        }
        #[cfg(not(feature = "mongo-repo"))]
        {
            let _ = config;
            Err(RepositoryError::configuration(
                "MongoDB repository feature not enabled",
            ))
        }
    }

    async fn connect_graph(&self) -> RepositoryResult<Arc<dyn RouteGraphStore>> {
        let config = self
            .neo4j
            .as_ref()
            .ok_or_else(|| RepositoryError::configuration("NEO4J_URI is not configured"))?;

        #[cfg(feature = "neo4j-repo")]
        {
            let store = super::repositories::Neo4jGraphStore::connect(config).await?;
            Ok(Arc::new(store) as Arc<dyn RouteGraphStore>)
        }
        #[cfg(not(feature = "neo4j-repo"))]
        {
            let _ = config;
            Err(RepositoryError::configuration(
                "Neo4j repository feature not enabled",
            ))
        }
    }
}

/// Factory for store connectors.
///
/// # Example
/// ```ignore
/// use flight_analytics::db::{ConnectionProvider, RepositoryFactory};
/// use flight_analytics::services::StatusBoard;
///
/// let connector = RepositoryFactory::from_env()?;
/// let provider = ConnectionProvider::new(connector, StatusBoard::new());
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a connector based on type, reading store settings from the environment.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn StoreConnector>> {
        match repo_type {
            RepositoryType::Live => Ok(Arc::new(LiveConnector::from_env())),
            RepositoryType::Local => match std::env::var("LOCAL_FIXTURE") {
                Ok(path) if !path.is_empty() => Self::create_local_from_file(path),
                _ => Ok(Self::create_local(LocalDataset::default())),
            },
        }
    }

    /// Create in-memory stores over a dataset.
    pub fn create_local(dataset: LocalDataset) -> Arc<dyn StoreConnector> {
        Arc::new(LocalConnector::from_dataset(&dataset))
    }

    /// Create in-memory stores seeded from a JSON fixture file.
    pub fn create_local_from_file<P: AsRef<Path>>(
        path: P,
    ) -> RepositoryResult<Arc<dyn StoreConnector>> {
        let dataset = LocalDataset::from_json_file(path)?;
        Ok(Self::create_local(dataset))
    }

    /// Create a connector from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to decide; see [`RepositoryType::from_env`].
    pub fn from_env() -> RepositoryResult<Arc<dyn StoreConnector>> {
        Self::create(RepositoryType::from_env())
    }

    /// Create a connector from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn StoreConnector>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create a connector from a RepositoryConfig instance.
    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn StoreConnector>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Live => Ok(Arc::new(LiveConnector::new(
                config.to_mongo_config(),
                config.to_neo4j_config(),
            ))),
            RepositoryType::Local => match &config.local.fixture {
                Some(path) => Self::create_local_from_file(path),
                None => Ok(Self::create_local(LocalDataset::default())),
            },
        }
    }
}
