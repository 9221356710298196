//! Store implementations module.
//!
//! - `local`: In-memory order and graph stores for unit testing and local development
//! - `mongo`: MongoDB document store (feature `mongo-repo`)
//! - `neo4j`: Neo4j graph store (feature `neo4j-repo`)
pub mod local;
#[cfg(feature = "mongo-repo")]
pub mod mongo;
#[cfg(feature = "neo4j-repo")]
pub mod neo4j;

pub use local::{LocalDataset, LocalGraphStore, LocalOrderStore};
#[cfg(feature = "mongo-repo")]
pub use mongo::MongoOrderStore;
#[cfg(feature = "neo4j-repo")]
pub use neo4j::Neo4jGraphStore;
