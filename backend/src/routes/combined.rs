use serde::{Deserialize, Serialize};

use crate::api::{LongestRoute, RouteKey};

/// A long route that is also among the most profitable ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRoute {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub flight_time_hr: f64,
    pub avg_diff: f64,
}

impl CombinedRoute {
    pub fn from_parts(route: &LongestRoute, avg_diff: f64) -> Self {
        Self {
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            distance_km: route.distance_km,
            flight_time_hr: route.flight_time_hr,
            avg_diff,
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.origin.clone(), self.destination.clone())
    }
}

pub const GET_COMBINED_ANALYSIS: &str = "get_combined_analysis";
