//! Neo4j implementation of the graph store using neo4rs.

use async_trait::async_trait;
use log::{debug, info};
use neo4rs::{query, ConfigBuilder, Graph, Query, Row};

use crate::api::{Airport, AirportConnections, LongestRoute, StoreKind};
use crate::db::config::Neo4jConfig;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, RouteGraphStore};
use crate::routes::airports::AIRPORT_CONNECTIONS_LIMIT;

const LONGEST_ROUTES: &str = "
    MATCH (a:Airport)-[r:CONNECTED_TO]->(b:Airport)
    WHERE r.distance_km > $min_distance_km AND r.flight_time_hr IS NOT NULL
    RETURN
        a.airport_code AS origin,
        b.airport_code AS destination,
        r.distance_km AS distance_km,
        r.flight_time_hr AS flight_time_hr
    ORDER BY r.distance_km DESC
    LIMIT $n_routes
";

const AIRPORT_CONNECTIONS: &str = "
    MATCH (a:Airport)-[:CONNECTED_TO]-(b:Airport)
    WHERE a.airport_code = $airport_code
    RETURN
        a.airport_code AS airport,
        a.city AS city,
        COUNT(DISTINCT b) AS total_connections
    ORDER BY total_connections DESC
    LIMIT $limit
";

const LIST_AIRPORTS: &str = "
    MATCH (a:Airport)
    RETURN DISTINCT a.airport_code AS code, a.city AS city
    ORDER BY code
";

/// Graph store backed by a pooled bolt connection.
#[derive(Clone)]
pub struct Neo4jGraphStore {
    graph: Graph,
}

impl Neo4jGraphStore {
    /// Open the connection pool.
    pub async fn connect(config: &Neo4jConfig) -> RepositoryResult<Self> {
        let context = || {
            ErrorContext::new("connect")
                .with_store(StoreKind::Graph)
                .with_details(config.uri.clone())
        };

        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size);
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }

        let neo4j_config = builder
            .build()
            .map_err(|e| RepositoryError::Configuration {
                message: e.to_string(),
                context: context(),
            })?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| RepositoryError::connection_with_context(e.to_string(), context()))?;

        info!("Neo4j connection pool opened for {}", config.uri);
        Ok(Self { graph })
    }

    async fn fetch<T>(
        &self,
        operation: &str,
        q: Query,
        decode: impl Fn(&Row) -> Result<T, String>,
    ) -> RepositoryResult<Vec<T>> {
        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?
        {
            let decoded = decode(&row).map_err(|message| {
                RepositoryError::internal_with_context(
                    format!("Unexpected record shape: {}", message),
                    ErrorContext::new(operation).with_store(StoreKind::Graph),
                )
            })?;
            rows.push(decoded);
        }

        debug!("{} returned {} records", operation, rows.len());
        Ok(rows)
    }
}

fn column<T: serde::de::DeserializeOwned>(row: &Row, key: &str) -> Result<T, String> {
    row.get::<T>(key).map_err(|e| format!("{}: {}", key, e))
}

fn longest_route(row: &Row) -> Result<LongestRoute, String> {
    Ok(LongestRoute {
        origin: column(row, "origin")?,
        destination: column(row, "destination")?,
        distance_km: column(row, "distance_km")?,
        flight_time_hr: column(row, "flight_time_hr")?,
    })
}

fn airport_connections(row: &Row) -> Result<AirportConnections, String> {
    Ok(AirportConnections {
        airport: column(row, "airport")?,
        city: column(row, "city")?,
        total_connections: column(row, "total_connections")?,
    })
}

fn airport(row: &Row) -> Result<Airport, String> {
    Ok(Airport {
        code: column(row, "code")?,
        city: column(row, "city")?,
    })
}

fn clamp_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl RouteGraphStore for Neo4jGraphStore {
    async fn ping(&self) -> RepositoryResult<()> {
        self.graph.run(query("RETURN 1")).await.map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("ping").with_store(StoreKind::Graph),
            )
        })
    }

    async fn longest_routes(&self, limit: usize) -> RepositoryResult<Vec<LongestRoute>> {
        let q = query(LONGEST_ROUTES)
            .param(
                "min_distance_km",
                crate::routes::longest::LONG_ROUTE_MIN_DISTANCE_KM,
            )
            .param("n_routes", clamp_limit(limit));

        self.fetch("longest_routes", q, longest_route).await
    }

    async fn airport_connections(
        &self,
        airport_code: &str,
    ) -> RepositoryResult<Vec<AirportConnections>> {
        let q = query(AIRPORT_CONNECTIONS)
            .param("airport_code", airport_code)
            .param("limit", clamp_limit(AIRPORT_CONNECTIONS_LIMIT));

        self.fetch("airport_connections", q, airport_connections).await
    }

    async fn list_airports(&self) -> RepositoryResult<Vec<Airport>> {
        self.fetch("list_airports", query(LIST_AIRPORTS), airport).await
    }
}
