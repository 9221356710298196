//! Store-side data models.
//!
//! These mirror the documents and graph elements the external stores hold.
//! The live stores never materialize them (the databases aggregate
//! server-side); the in-memory stores evaluate queries over them directly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Flight identifier as stored on an order, keeping its stored type.
///
/// Only [`FlightRef::Int`] references take part in the profitability
/// aggregation, matching a BSON `$type: "int"` filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlightRef {
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
}

impl FlightRef {
    pub fn is_int(&self) -> bool {
        matches!(self, FlightRef::Int(_))
    }

    /// Numeric value used for equality against a price reference id.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlightRef::Int(v) => Some(f64::from(*v)),
            FlightRef::Long(v) => Some(*v as f64),
            FlightRef::Double(v) => Some(*v),
            FlightRef::Text(_) => None,
        }
    }
}

/// A ticket order (`orders` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub flight_id: Option<FlightRef>,
    pub origin: String,
    pub destination: String,
    pub total_price: f64,
    pub depart_date: NaiveDateTime,
}

/// A reference price (`flight_prices` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReference {
    pub id: i64,
    pub best_price: f64,
}

/// An `Airport` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportNode {
    pub airport_code: String,
    pub city: String,
}

/// A directed `CONNECTED_TO` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEdge {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub flight_time_hr: Option<f64>,
}

/// Inclusive departure-date window applied to orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl OrderWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whole days from `first` through the end of `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let start = first.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = last.and_hms_opt(23, 59, 59).unwrap_or_default();
        Self { start, end }
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        *at >= self.start && *at <= self.end
    }
}

impl Default for OrderWindow {
    /// 2023-03-10 through 2023-04-09, end of day.
    fn default() -> Self {
        let first = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap_or_default();
        let last = NaiveDate::from_ymd_opt(2023, 4, 9).unwrap_or_default();
        Self::days(first, last)
    }
}
