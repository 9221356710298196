//! # Flight Analytics Backend
//!
//! Read-only analytics over flight ticket orders and an airport route graph.
//!
//! Orders and reference prices live in a MongoDB document store; airports and
//! their connections live in a Neo4j graph store. The crate answers four
//! dashboard questions:
//!
//! - which routes sell furthest above their best reference price,
//! - which direct routes are longest,
//! - how long routes and profitable routes overlap,
//! - how connected a given airport is.
//!
//! ## Architecture
//!
//! - [`api`]: Row types and the [`QueryOutcome`](api::QueryOutcome) envelope
//! - [`db`]: Store traits, MongoDB/Neo4j/in-memory implementations, configuration
//!   and the connection provider
//! - [`services`]: Query functions, result cache, route combiner, status board
//! - [`routes`]: Per-view row types and query names
//! - [`http`]: Axum-based HTTP server and request handlers

// RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
