//! Service layer for the dashboard queries.
//!
//! Sits between the store traits and the HTTP layer: memoizes query results,
//! joins the two stores' outputs, and records operator-visible status.

pub mod analytics;
pub mod cache;
pub mod combine;
pub mod status;

pub use analytics::AnalyticsService;
pub use cache::QueryCache;
pub use combine::combine_routes;
pub use status::{StatusBoard, StatusEntry, StatusLevel};
