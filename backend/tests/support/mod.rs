#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use flight_analytics::db::models::{AirportNode, FlightRef, OrderRecord, PriceReference, RouteEdge};
use flight_analytics::db::{
    CacheConfig, ConnectionProvider, LocalConnector, LocalDataset, LocalGraphStore,
    LocalOrderStore,
};
use flight_analytics::services::{AnalyticsService, StatusBoard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

pub fn order(
    flight_id: Option<FlightRef>,
    origin: &str,
    destination: &str,
    total_price: f64,
    depart_date: NaiveDateTime,
) -> OrderRecord {
    OrderRecord {
        flight_id,
        origin: origin.to_string(),
        destination: destination.to_string(),
        total_price,
        depart_date,
    }
}

pub fn price(id: i64, best_price: f64) -> PriceReference {
    PriceReference { id, best_price }
}

pub fn airport(code: &str, city: &str) -> AirportNode {
    AirportNode {
        airport_code: code.to_string(),
        city: city.to_string(),
    }
}

pub fn edge(origin: &str, destination: &str, distance_km: f64, flight_time_hr: Option<f64>) -> RouteEdge {
    RouteEdge {
        origin: origin.to_string(),
        destination: destination.to_string(),
        distance_km: Some(distance_km),
        flight_time_hr,
    }
}

/// Six airports, a handful of routes and orders in and around the window.
///
/// Profitability over the window: CGK->DPS 300000, CGK->KNO 100000,
/// SUB->UPG 50000. Long routes: CGK->KNO 1420, CGK->DPS 1180, DPS->CGK 1180.
pub fn sample_dataset() -> LocalDataset {
    LocalDataset {
        orders: vec![
            order(Some(FlightRef::Int(101)), "CGK", "DPS", 1_500_000.0, at(2023, 3, 15, 8, 0)),
            order(Some(FlightRef::Int(102)), "CGK", "KNO", 2_000_000.0, at(2023, 3, 20, 9, 30)),
            order(Some(FlightRef::Int(103)), "SUB", "UPG", 900_000.0, at(2023, 4, 9, 23, 30)),
            // outside the window
            order(Some(FlightRef::Int(101)), "CGK", "DPS", 1_000_000.0, at(2023, 5, 1, 7, 0)),
            // non-integer reference
            order(Some(FlightRef::Text("101".into())), "CGK", "DPS", 9_000_000.0, at(2023, 3, 16, 7, 0)),
            // no matching price
            order(Some(FlightRef::Int(199)), "CGK", "JOG", 700_000.0, at(2023, 3, 18, 7, 0)),
        ],
        flight_prices: vec![
            price(101, 1_200_000.0),
            price(102, 1_900_000.0),
            price(103, 850_000.0),
        ],
        airports: vec![
            airport("CGK", "Jakarta"),
            airport("DPS", "Denpasar"),
            airport("KNO", "Medan"),
            airport("SUB", "Surabaya"),
            airport("UPG", "Makassar"),
            airport("JOG", "Yogyakarta"),
        ],
        routes: vec![
            edge("CGK", "DPS", 1180.0, Some(1.9)),
            edge("DPS", "CGK", 1180.0, Some(1.9)),
            edge("CGK", "KNO", 1420.0, Some(2.3)),
            edge("CGK", "JOG", 430.0, Some(1.1)),
            edge("SUB", "UPG", 780.0, Some(1.3)),
            edge("KNO", "UPG", 2400.0, None),
        ],
    }
}

/// An analytics service over local stores, keeping handles for inspection.
pub struct Harness {
    pub analytics: AnalyticsService,
    pub orders: Arc<LocalOrderStore>,
    pub graph: Arc<LocalGraphStore>,
}

pub fn harness(orders: LocalOrderStore, graph: LocalGraphStore) -> Harness {
    let orders = Arc::new(orders);
    let graph = Arc::new(graph);
    let connector = Arc::new(LocalConnector::new(orders.clone(), graph.clone()));
    let provider = Arc::new(ConnectionProvider::new(connector, StatusBoard::new()));
    Harness {
        analytics: AnalyticsService::new(provider, &CacheConfig::default()),
        orders,
        graph,
    }
}

pub fn sample_harness() -> Harness {
    let dataset = sample_dataset();
    harness(dataset.order_store(), dataset.graph_store())
}
