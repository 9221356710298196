use serde::{Deserialize, Serialize};

use crate::api::RouteKey;

/// Aggregated profitability of one route over the order window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitableRoute {
    pub origin: String,
    pub destination: String,
    /// Number of matched orders
    pub total_order: i64,
    /// Sum of `total_price` over matched orders
    pub total_revenue: f64,
    /// Mean of `total_price - best_price` over matched orders
    pub avg_diff: f64,
}

impl ProfitableRoute {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.origin.clone(), self.destination.clone())
    }
}

/// Profitability row without totals, as consumed by the combined analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMargin {
    pub origin: String,
    pub destination: String,
    pub avg_diff: f64,
}

impl RouteMargin {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.origin.clone(), self.destination.clone())
    }
}

impl From<ProfitableRoute> for RouteMargin {
    fn from(route: ProfitableRoute) -> Self {
        Self {
            origin: route.origin,
            destination: route.destination,
            avg_diff: route.avg_diff,
        }
    }
}

pub const GET_TOP_PROFITABLE_ROUTES: &str = "get_top_profitable_routes";
pub const GET_ROUTE_MARGINS: &str = "get_route_margins";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_from_profitable_route() {
        let route = ProfitableRoute {
            origin: "CGK".into(),
            destination: "DPS".into(),
            total_order: 3,
            total_revenue: 4_500_000.0,
            avg_diff: 300_000.0,
        };
        let margin = RouteMargin::from(route.clone());
        assert_eq!(margin.key(), route.key());
        assert_eq!(margin.avg_diff, 300_000.0);
    }

    #[test]
    fn test_profitable_route_json_field_names() {
        let route = ProfitableRoute {
            origin: "CGK".into(),
            destination: "KNO".into(),
            total_order: 1,
            total_revenue: 10.0,
            avg_diff: 2.5,
        };
        let json = serde_json::to_value(&route).unwrap();
        for field in ["origin", "destination", "total_order", "total_revenue", "avg_diff"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
    }
}
