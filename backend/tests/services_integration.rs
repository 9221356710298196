//! End-to-end behaviour of the query functions over the in-memory stores.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use flight_analytics::api::{Notice, StoreKind};
use flight_analytics::db::models::FlightRef;
use flight_analytics::db::{ConnectionState, LocalGraphStore, LocalOrderStore};
use flight_analytics::services::StatusLevel;

use support::{at, harness, order, price, sample_dataset, sample_harness};

// =============================================================================
// get_top_profitable_routes
// =============================================================================

#[tokio::test]
async fn test_single_order_scenario() {
    let h = harness(
        LocalOrderStore::new(
            vec![order(Some(FlightRef::Int(101)), "CGK", "DPS", 1_500_000.0, at(2023, 3, 15, 8, 0))],
            vec![price(101, 1_200_000.0)],
        ),
        LocalGraphStore::default(),
    );

    let outcome = h.analytics.get_top_profitable_routes(10).await;
    assert!(outcome.notice.is_none());
    assert_eq!(outcome.rows.len(), 1);

    let row = &outcome.rows[0];
    assert_eq!((row.origin.as_str(), row.destination.as_str()), ("CGK", "DPS"));
    assert_eq!(row.total_order, 1);
    assert_eq!(row.total_revenue, 1_500_000.0);
    assert_eq!(row.avg_diff, 300_000.0);
}

#[tokio::test]
async fn test_profitable_routes_sorted_unique_and_capped() {
    let h = sample_harness();

    let all = h.analytics.get_top_profitable_routes(10).await;
    let keys: Vec<String> = all.rows.iter().map(|r| r.key().to_string()).collect();
    assert_eq!(keys, vec!["CGK->DPS", "CGK->KNO", "SUB->UPG"]);

    let unique: HashSet<String> = keys.iter().cloned().collect();
    assert_eq!(unique.len(), keys.len());
    assert!(all.rows.windows(2).all(|w| w[0].avg_diff >= w[1].avg_diff));

    let top_two = h.analytics.get_top_profitable_routes(2).await;
    assert_eq!(top_two.rows.len(), 2);
    assert_eq!(top_two.rows[0].avg_diff, 300_000.0);
}

#[tokio::test]
async fn test_window_end_is_inclusive_to_end_of_day() {
    let h = sample_harness();
    let outcome = h.analytics.get_top_profitable_routes(10).await;
    // SUB->UPG departs 2023-04-09 23:30
    assert!(outcome.rows.iter().any(|r| r.origin == "SUB" && r.destination == "UPG"));
}

#[tokio::test]
async fn test_document_store_unreachable() {
    let h = harness(
        LocalOrderStore::unreachable("server selection timeout"),
        LocalGraphStore::default(),
    );

    let outcome = h.analytics.get_top_profitable_routes(10).await;
    assert!(outcome.is_empty());
    assert_eq!(
        outcome.notice,
        Some(Notice::ConnectionUnavailable {
            store: StoreKind::Document,
            message: "server selection timeout".to_string()
        })
    );
    assert_eq!(h.orders.queries_executed(), 0);
}

// =============================================================================
// get_longest_routes
// =============================================================================

#[tokio::test]
async fn test_longest_routes_filtered_and_sorted() {
    let h = sample_harness();
    let outcome = h.analytics.get_longest_routes(10).await;

    assert_eq!(outcome.rows.len(), 3);
    assert!(outcome.rows.iter().all(|r| r.distance_km > 1000.0));
    assert!(outcome
        .rows
        .windows(2)
        .all(|w| w[0].distance_km >= w[1].distance_km));
    assert_eq!(outcome.rows[0].key().to_string(), "CGK->KNO");
    // KNO->UPG has no flight time
    assert!(!outcome.rows.iter().any(|r| r.origin == "KNO"));
}

#[tokio::test]
async fn test_longest_routes_cap() {
    let h = sample_harness();
    let outcome = h.analytics.get_longest_routes(1).await;
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].distance_km, 1420.0);
}

// =============================================================================
// get_combined_analysis
// =============================================================================

#[tokio::test]
async fn test_combined_is_inner_join_of_both_results() {
    let h = sample_harness();

    let combined = h.analytics.get_combined_analysis(30_000, 100).await;
    assert!(combined.notice.is_none());

    let keys: Vec<String> = combined.rows.iter().map(|r| r.key().to_string()).collect();
    assert_eq!(keys, vec!["CGK->KNO", "CGK->DPS"]);

    let longest: HashSet<String> = h
        .analytics
        .get_longest_routes(30_000)
        .await
        .rows
        .iter()
        .map(|r| r.key().to_string())
        .collect();
    let margins: HashSet<String> = h
        .analytics
        .get_route_margins(100)
        .await
        .rows
        .iter()
        .map(|r| r.key().to_string())
        .collect();
    for key in &keys {
        assert!(longest.contains(key) && margins.contains(key));
    }

    let dps = combined.rows.iter().find(|r| r.destination == "DPS").unwrap();
    assert_eq!(dps.distance_km, 1180.0);
    assert_eq!(dps.avg_diff, 300_000.0);
}

#[tokio::test]
async fn test_long_route_without_profitable_pair_is_excluded() {
    let h = sample_harness();
    let combined = h.analytics.get_combined_analysis(30_000, 100).await;
    // DPS->CGK is long but has no orders.
    assert!(!combined
        .rows
        .iter()
        .any(|r| r.origin == "DPS" && r.destination == "CGK"));
}

#[tokio::test]
async fn test_combined_short_circuits_on_empty_graph() {
    let dataset = sample_dataset();
    let h = harness(dataset.order_store(), LocalGraphStore::default());

    let combined = h.analytics.get_combined_analysis(30_000, 100).await;
    assert!(combined.is_empty());
    assert_eq!(combined.notice, Some(Notice::NoGraphRoutes));
    assert_eq!(h.orders.queries_executed(), 0);

    let warning = h.analytics.status().latest().unwrap();
    assert_eq!(warning.level, StatusLevel::Warning);
    assert_eq!(warning.store, Some(StoreKind::Graph));
}

#[tokio::test]
async fn test_combined_warns_when_no_profitable_routes() {
    let dataset = sample_dataset();
    let h = harness(LocalOrderStore::default(), dataset.graph_store());

    let combined = h.analytics.get_combined_analysis(30_000, 100).await;
    assert!(combined.is_empty());
    assert_eq!(combined.notice, Some(Notice::NoProfitableRoutes));
    assert!(!combined.is_failure());
    assert_eq!(h.orders.queries_executed(), 1);
}

#[tokio::test]
async fn test_combined_with_document_store_unavailable() {
    let dataset = sample_dataset();
    let h = harness(
        LocalOrderStore::unreachable("authentication failed"),
        dataset.graph_store(),
    );

    let combined = h.analytics.get_combined_analysis(30_000, 100).await;
    assert!(combined.is_empty());
    assert!(matches!(
        combined.notice,
        Some(Notice::ConnectionUnavailable {
            store: StoreKind::Document,
            ..
        })
    ));
    assert_eq!(h.graph.queries_executed(), 0);
}

#[tokio::test]
async fn test_combined_shares_longest_routes_cache() {
    let h = sample_harness();
    h.analytics.get_longest_routes(30_000).await;
    h.analytics.get_combined_analysis(30_000, 100).await;
    assert_eq!(h.graph.queries_executed(), 1);
}

// =============================================================================
// get_airport_connections / list_airports
// =============================================================================

#[tokio::test]
async fn test_airport_connections_counts_distinct_neighbours() {
    let h = sample_harness();
    let outcome = h.analytics.get_airport_connections("CGK").await;

    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].airport, "CGK");
    assert_eq!(outcome.rows[0].city, "Jakarta");
    // DPS (both directions), KNO, JOG
    assert_eq!(outcome.rows[0].total_connections, 3);
}

#[tokio::test]
async fn test_unknown_airport_code_yields_zero_rows() {
    let h = sample_harness();
    let outcome = h.analytics.get_airport_connections("XXX").await;
    assert!(outcome.is_empty());
    assert!(outcome.notice.is_none());
}

#[tokio::test]
async fn test_list_airports_sorted_by_code() {
    let h = sample_harness();
    let codes: Vec<String> = h
        .analytics
        .list_airports()
        .await
        .rows
        .into_iter()
        .map(|a| a.code)
        .collect();
    assert_eq!(codes, vec!["CGK", "DPS", "JOG", "KNO", "SUB", "UPG"]);
}

// =============================================================================
// Memoization and connection lifecycle
// =============================================================================

#[tokio::test]
async fn test_repeated_calls_are_identical_and_cached() {
    let h = sample_harness();

    let first = h.analytics.get_top_profitable_routes(10).await;
    let second = h.analytics.get_top_profitable_routes(10).await;
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(h.orders.queries_executed(), 1);

    // Different parameters are a different entry.
    h.analytics.get_top_profitable_routes(5).await;
    assert_eq!(h.orders.queries_executed(), 2);

    h.analytics.invalidate_caches();
    h.analytics.get_top_profitable_routes(10).await;
    assert_eq!(h.orders.queries_executed(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_fetch() {
    let h = Arc::new(sample_harness());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.analytics.get_top_profitable_routes(10).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for task in tasks {
        outcomes.push(serde_json::to_vec(&task.await.unwrap()).unwrap());
    }

    assert!(outcomes.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(h.orders.queries_executed(), 1);
}

#[tokio::test]
async fn test_failed_queries_are_retried() {
    let dataset = sample_dataset();
    let h = harness(
        dataset.order_store(),
        dataset.graph_store().with_query_error("transient"),
    );

    h.analytics.get_longest_routes(10).await;
    h.analytics.get_longest_routes(10).await;
    assert_eq!(h.graph.queries_executed(), 2);
}

#[tokio::test]
async fn test_connect_reports_each_store() {
    let h = harness(
        LocalOrderStore::default(),
        LocalGraphStore::unreachable("connection refused"),
    );

    assert!(!h.analytics.connect().await);
    assert_eq!(
        h.analytics.connection_state(StoreKind::Document),
        ConnectionState::Connected
    );
    assert!(matches!(
        h.analytics.connection_state(StoreKind::Graph),
        ConnectionState::Unavailable { .. }
    ));

    let levels: Vec<StatusLevel> = h
        .analytics
        .status()
        .entries()
        .into_iter()
        .map(|e| e.level)
        .collect();
    assert!(levels.contains(&StatusLevel::Success));
    assert!(levels.contains(&StatusLevel::Error));

    h.analytics.close().await;
    assert_eq!(
        h.analytics.connection_state(StoreKind::Document),
        ConnectionState::Closed
    );
}
