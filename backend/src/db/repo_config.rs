//! Configuration file support.
//!
//! Reads store selection, connection settings and cache settings from an
//! `analytics.toml` file:
//!
//! ```toml
//! [repository]
//! type = "live"
//!
//! [mongo]
//! uri = "mongodb://localhost:27017/"
//! database = "TIKET"
//!
//! [neo4j]
//! uri = "bolt://localhost:7687"
//! password = "secret"
//!
//! [cache]
//! ttl_seconds = 600
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::config::{CacheConfig, MongoConfig, Neo4jConfig};
use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Configuration loaded from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub mongo: MongoSettings,
    #[serde(default)]
    pub neo4j: Neo4jSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub local: LocalSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// MongoDB settings. An empty `uri` leaves the document store unconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettings {
    #[serde(default)]
    pub uri: String,
    #[serde(default = "default_mongo_database")]
    pub database: String,
    #[serde(default = "default_orders_collection")]
    pub orders_collection: String,
    #[serde(default = "default_prices_collection")]
    pub prices_collection: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

/// Neo4j settings. An empty `uri` leaves the graph store unconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default)]
    pub uri: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

/// In-memory store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    /// JSON fixture seeding both stores
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

fn default_mongo_database() -> String {
    MongoConfig::default().database
}

fn default_orders_collection() -> String {
    MongoConfig::default().orders_collection
}

fn default_prices_collection() -> String {
    MongoConfig::default().prices_collection
}

fn default_connect_timeout() -> u64 {
    MongoConfig::default().connect_timeout_sec
}

fn default_neo4j_user() -> String {
    Neo4jConfig::default().user
}

fn default_max_connections() -> usize {
    Neo4jConfig::default().max_connections
}

fn default_fetch_size() -> usize {
    Neo4jConfig::default().fetch_size
}

fn default_ttl_seconds() -> u64 {
    CacheConfig::default().ttl_seconds
}

fn default_max_entries() -> u64 {
    CacheConfig::default().max_entries
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: default_mongo_database(),
            orders_collection: default_orders_collection(),
            prices_collection: default_prices_collection(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: String::new(),
            user: default_neo4j_user(),
            password: String::new(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analytics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("analytics.toml"),
            PathBuf::from("backend/analytics.toml"),
            PathBuf::from("../analytics.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No analytics.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Document store settings, if a URI is configured.
    pub fn to_mongo_config(&self) -> Option<MongoConfig> {
        if self.mongo.uri.is_empty() {
            return None;
        }
        Some(MongoConfig {
            uri: self.mongo.uri.clone(),
            database: self.mongo.database.clone(),
            orders_collection: self.mongo.orders_collection.clone(),
            prices_collection: self.mongo.prices_collection.clone(),
            connect_timeout_sec: self.mongo.connect_timeout,
        })
    }

    /// Graph store settings, if a URI is configured.
    pub fn to_neo4j_config(&self) -> Option<Neo4jConfig> {
        if self.neo4j.uri.is_empty() {
            return None;
        }
        Some(Neo4jConfig {
            uri: self.neo4j.uri.clone(),
            user: self.neo4j.user.clone(),
            password: self.neo4j.password.clone(),
            database: self.neo4j.database.clone().filter(|db| !db.is_empty()),
            max_connections: self.neo4j.max_connections,
            fetch_size: self.neo4j.fetch_size,
        })
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl_seconds: self.cache.ttl_seconds,
            max_entries: self.cache.max_entries,
        }
    }
}
