//! Join of long routes with their profit margins.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::api::{CombinedRoute, LongestRoute, RouteKey, RouteMargin};

/// Inner-join long routes and route margins on `(origin, destination)`.
///
/// Routes without a margin, and margins without a long route, are dropped.
/// The result is sorted by distance, then margin, both descending.
pub fn combine_routes(longest: &[LongestRoute], margins: &[RouteMargin]) -> Vec<CombinedRoute> {
    let by_route: HashMap<RouteKey, f64> = margins
        .iter()
        .map(|margin| (margin.key(), margin.avg_diff))
        .collect();

    let mut combined: Vec<CombinedRoute> = longest
        .iter()
        .filter_map(|route| {
            by_route
                .get(&route.key())
                .map(|avg_diff| CombinedRoute::from_parts(route, *avg_diff))
        })
        .collect();

    combined.sort_by(|a, b| {
        b.distance_km
            .partial_cmp(&a.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.avg_diff.partial_cmp(&a.avg_diff).unwrap_or(Ordering::Equal))
    });
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(origin: &str, destination: &str, distance_km: f64) -> LongestRoute {
        LongestRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
            distance_km,
            flight_time_hr: distance_km / 800.0,
        }
    }

    fn margin(origin: &str, destination: &str, avg_diff: f64) -> RouteMargin {
        RouteMargin {
            origin: origin.to_string(),
            destination: destination.to_string(),
            avg_diff,
        }
    }

    #[test]
    fn test_inner_join_keeps_only_shared_routes() {
        let longest = vec![long("CGK", "DPS", 1200.0), long("CGK", "KNO", 1400.0)];
        let margins = vec![margin("CGK", "DPS", 300_000.0), margin("SUB", "UPG", 50.0)];

        let combined = combine_routes(&longest, &margins);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].origin, "CGK");
        assert_eq!(combined[0].destination, "DPS");
        assert_eq!(combined[0].distance_km, 1200.0);
        assert_eq!(combined[0].avg_diff, 300_000.0);
    }

    #[test]
    fn test_direction_matters() {
        let longest = vec![long("DPS", "CGK", 1200.0)];
        let margins = vec![margin("CGK", "DPS", 10.0)];
        assert!(combine_routes(&longest, &margins).is_empty());
    }

    #[test]
    fn test_sorted_by_distance_then_margin() {
        let longest = vec![
            long("A", "B", 1500.0),
            long("C", "D", 3000.0),
            long("E", "F", 1500.0),
        ];
        let margins = vec![margin("A", "B", 10.0), margin("C", "D", 1.0), margin("E", "F", 20.0)];

        let keys: Vec<String> = combine_routes(&longest, &margins)
            .iter()
            .map(|row| row.key().to_string())
            .collect();
        assert_eq!(keys, vec!["C->D", "E->F", "A->B"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(combine_routes(&[], &[margin("A", "B", 1.0)]).is_empty());
        assert!(combine_routes(&[long("A", "B", 2000.0)], &[]).is_empty());
    }
}
