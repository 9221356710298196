//! MongoDB implementation of the document store.
//!
//! Profitability is computed server-side with a single aggregation pipeline
//! over the `orders` collection:
//!
//! ```text
//! $match (depart_date window, flight_id is int)
//!   -> $lookup flight_prices on flight_id = id
//!   -> $unwind
//!   -> $addFields price_diff = total_price - best_price
//!   -> $group by (origin, destination)
//!   -> $match avg_diff is not null
//!   -> $sort avg_diff desc -> $limit -> $project
//! ```

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{self, doc, DateTime, Document};
use mongodb::options::ClientOptions;
use mongodb::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::{ProfitableRoute, RouteMargin, StoreKind};
use crate::db::config::MongoConfig;
use crate::db::models::OrderWindow;
use crate::db::repository::{ErrorContext, OrderStore, RepositoryError, RepositoryResult};

/// Document store backed by the official MongoDB driver.
#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    client: Client,
    config: MongoConfig,
}

impl MongoOrderStore {
    /// Build a client from the configuration.
    ///
    /// The driver connects lazily; reachability is checked by [`OrderStore::ping`].
    pub async fn connect(config: MongoConfig) -> RepositoryResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("parse_uri").with_store(StoreKind::Document),
            )
        })?;

        let timeout = Duration::from_secs(config.connect_timeout_sec);
        options.app_name = Some("flight-analytics".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("create_client").with_store(StoreKind::Document),
            )
        })?;

        info!(
            "MongoDB client created for database '{}'",
            config.database
        );
        Ok(Self { client, config })
    }

    /// Build the profitability pipeline.
    ///
    /// `with_totals` adds the order count and revenue accumulators.
    pub(crate) fn profitability_pipeline(
        &self,
        window: &OrderWindow,
        limit: usize,
        with_totals: bool,
    ) -> Vec<Document> {
        let start = DateTime::from_millis(window.start.and_utc().timestamp_millis());
        let end = DateTime::from_millis(window.end.and_utc().timestamp_millis());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let prices = self.config.prices_collection.clone();

        let mut group = doc! {
            "_id": { "origin": "$origin", "destination": "$destination" },
            "avg_diff": { "$avg": "$price_diff" },
        };
        let mut projection = doc! {
            "_id": 0,
            "origin": "$_id.origin",
            "destination": "$_id.destination",
            "avg_diff": 1,
        };
        if with_totals {
            group.insert("total_order", doc! { "$sum": 1 });
            group.insert("total_revenue", doc! { "$sum": "$total_price" });
            projection.insert("total_order", 1);
            projection.insert("total_revenue", 1);
        }

        vec![
            doc! {
                "$match": {
                    "depart_date": { "$gte": start, "$lte": end },
                    "flight_id": { "$type": "int" },
                }
            },
            doc! {
                "$lookup": {
                    "from": prices,
                    "localField": "flight_id",
                    "foreignField": "id",
                    "as": "flight_info",
                }
            },
            doc! { "$unwind": "$flight_info" },
            doc! {
                "$addFields": {
                    "price_diff": { "$subtract": ["$total_price", "$flight_info.best_price"] }
                }
            },
            doc! { "$group": group },
            // Groups whose prices all lack `best_price` average to null.
            doc! { "$match": { "avg_diff": { "$ne": null } } },
            doc! { "$sort": { "avg_diff": -1, "_id.origin": 1, "_id.destination": 1 } },
            doc! { "$limit": limit },
            doc! { "$project": projection },
        ]
    }

    async fn aggregate<T: DeserializeOwned>(
        &self,
        operation: &str,
        pipeline: Vec<Document>,
    ) -> RepositoryResult<Vec<T>> {
        // The server rejects `$limit: 0`.
        let zero_limit = pipeline
            .iter()
            .any(|stage| matches!(stage.get_i64("$limit"), Ok(0)));
        if zero_limit {
            return Ok(Vec::new());
        }

        let orders = self
            .client
            .database(&self.config.database)
            .collection::<Document>(&self.config.orders_collection);

        let cursor = orders
            .aggregate(pipeline)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        debug!("{} returned {} documents", operation, documents.len());
        decode_documents(operation, documents)
    }
}

fn decode_documents<T: DeserializeOwned>(
    operation: &str,
    documents: Vec<Document>,
) -> RepositoryResult<Vec<T>> {
    documents
        .into_iter()
        .map(|document| {
            bson::from_document::<T>(document).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Unexpected document shape: {}", e),
                    ErrorContext::new(operation).with_store(StoreKind::Document),
                )
            })
        })
        .collect()
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    async fn ping(&self) -> RepositoryResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("ping").with_store(StoreKind::Document),
                )
            })?;
        Ok(())
    }

    async fn top_profitable_routes(
        &self,
        window: &OrderWindow,
        limit: usize,
    ) -> RepositoryResult<Vec<ProfitableRoute>> {
        let pipeline = self.profitability_pipeline(window, limit, true);
        self.aggregate("top_profitable_routes", pipeline).await
    }

    async fn top_route_margins(
        &self,
        window: &OrderWindow,
        limit: usize,
    ) -> RepositoryResult<Vec<RouteMargin>> {
        let pipeline = self.profitability_pipeline(window, limit, false);
        self.aggregate("top_route_margins", pipeline).await
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}
