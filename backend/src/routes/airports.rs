use serde::{Deserialize, Serialize};

/// Airport entry for the selector, ordered by code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub city: String,
}

impl Airport {
    /// Label shown in the selector, e.g. `CGK - Jakarta`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.city)
    }
}

/// Distinct neighbor count for one airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportConnections {
    pub airport: String,
    pub city: String,
    pub total_connections: i64,
}

/// Upper bound on rows returned by the connections query.
pub const AIRPORT_CONNECTIONS_LIMIT: usize = 10;

pub const GET_AIRPORT_CONNECTIONS: &str = "get_airport_connections";
pub const LIST_AIRPORTS: &str = "list_airports";
