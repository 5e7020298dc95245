//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding the verbose builder pattern and keeping the rest of the crate
//! decoupled from `qdrant-client`. Methods take the physical collection name
//! because the index maintains one collection per generation.

use crate::config::{DistanceKind, IndexConfig, VectorSpace};
use crate::errors::IndexError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

/// A facade over the Qdrant client.
pub struct QdrantFacade {
    client: Qdrant,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Uses the builder-based API of `qdrant-client` and supports optional
    /// API key authentication.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            distance: cfg.distance,
        })
    }

    /// Returns whether the collection exists. A client failure degrades to
    /// `Err`, which callers on read paths map to "absent".
    pub async fn collection_exists(&self, collection: &str) -> Result<bool, IndexError> {
        self.client
            .collection_exists(collection)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))
    }

    /// Number of points currently stored in the collection.
    pub async fn points_count(&self, collection: &str) -> Result<u64, IndexError> {
        let info = self
            .client
            .collection_info(collection)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }

    /// Ensures that the collection exists, creating it with the given vector
    /// space configuration when missing.
    pub async fn ensure_collection(
        &self,
        collection: &str,
        space: &VectorSpace,
    ) -> Result<(), IndexError> {
        if self.collection_exists(collection).await? {
            debug!("collection '{}' already exists", collection);
            return Ok(());
        }

        info!(
            "creating collection '{}' with size={} distance={:?}",
            collection, space.size, self.distance
        );

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(())
    }

    /// Deletes a collection. Failures are returned but safe to downgrade to a
    /// warning: an orphaned collection is garbage, not corruption.
    pub async fn delete_collection(&self, collection: &str) -> Result<(), IndexError> {
        warn!("deleting collection '{}'", collection);
        self.client
            .delete_collection(collection)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        Ok(())
    }

    /// Upserts a batch of points, waiting for the write to be applied so a
    /// completed batch is actually durable. Returns the number of points sent.
    pub async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<PointStruct>,
    ) -> Result<u64, IndexError> {
        if points.is_empty() {
            debug!("no points provided for upsert");
            return Ok(0);
        }

        let n = points.len() as u64;
        debug!("upserting {} points into collection '{}'", n, collection);

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(n)
    }

    /// Performs a similarity search.
    ///
    /// Returns `(score, payload)` tuples, best-first.
    pub async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        top_k: u64,
        exact: bool,
    ) -> Result<Vec<(f32, serde_json::Value)>, IndexError> {
        debug!(
            "searching in '{}' with top_k={}, exact={}",
            collection, top_k, exact
        );

        let mut builder = SearchPointsBuilder::new(collection, vector, top_k).with_payload(true);
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for r in res.result.into_iter() {
            let score = r.score;
            let payload_json = qpayload_to_json(r.payload);
            out.push((score, payload_json));
        }

        debug!("search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Nested objects/arrays are not part of our payload shape and map to `Null`.
fn qpayload_to_json(mut p: std::collections::HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
