use serde::{Deserialize, Serialize};

use crate::api::RouteKey;

/// Routes at or below this distance are not considered long.
pub const LONG_ROUTE_MIN_DISTANCE_KM: f64 = 1000.0;

/// A directed route edge longer than [`LONG_ROUTE_MIN_DISTANCE_KM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestRoute {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub flight_time_hr: f64,
}

impl LongestRoute {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.origin.clone(), self.destination.clone())
    }
}

pub const GET_LONGEST_ROUTES: &str = "get_longest_routes";
