//! Runtime and collection configuration.

use std::path::PathBuf;

use crate::errors::IndexError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of a collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for the vector index.
///
/// `collection` is the logical base name; physical collections are named
/// `{collection}_v{generation}` and the live generation is recorded in a
/// manifest file under `index_dir`.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant HTTP endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Logical collection base name.
    pub collection: String,
    /// Directory holding the index manifest. Owned by this crate; never
    /// hand-edited.
    pub index_dir: PathBuf,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Chunks embedded and persisted per batch; a crash mid-ingest loses at
    /// most one partial batch.
    pub upsert_batch: usize,
    /// Expected embedding dimensionality; probed from the provider if unset.
    pub embedding_dim: Option<usize>,
    /// Concurrent embedding calls during ingestion (default 4).
    pub embedding_concurrency: Option<usize>,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl IndexConfig {
    /// Creates a sane default config for a given Qdrant endpoint, collection
    /// base name, and index directory.
    pub fn new_default(
        url: impl Into<String>,
        collection: impl Into<String>,
        index_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            index_dir: index_dir.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 4000,
            embedding_dim: None,
            embedding_concurrency: None,
            exact_search: false,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(IndexError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(IndexError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(IndexError::Config("upsert_batch must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = IndexConfig::new_default("http://localhost:6334", "docs", "/tmp/idx");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.upsert_batch, 4000);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let cfg = IndexConfig::new_default("http://localhost:6334", "", "/tmp/idx");
        assert!(cfg.validate().is_err());
    }
}
