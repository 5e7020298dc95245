//! Persistent vector index over (embedding, chunk-text) pairs.
//!
//! One physical Qdrant collection per generation; the live generation is
//! recorded in the [`IndexManifest`]. Rebuilds ingest into the next
//! generation and commit the manifest only once the new collection is fully
//! built, so the old index is never discarded before its replacement exists.

use std::collections::HashMap;

use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::qdrant::{PointId, PointStruct, Value as QValue, Vector, Vectors, value, vectors};
use tracing::{debug, info, warn};

use crate::config::{IndexConfig, VectorSpace};
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_all;
use crate::errors::IndexError;
use crate::manifest::IndexManifest;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{ChunkRecord, ScoredChunk, stable_uuid};

/// Texts per embedding HTTP call inside one upsert batch.
const EMBED_CALL_BATCH: usize = 64;

/// Handle to the live vector index.
pub struct DocIndex {
    cfg: IndexConfig,
    facade: QdrantFacade,
    manifest: IndexManifest,
}

impl DocIndex {
    /// Attempts to open a previously persisted index.
    ///
    /// Returns `Ok(None)` when no manifest exists or the recorded collection
    /// is gone — absence is a normal state, not an error. Client failures
    /// (e.g. Qdrant unreachable) are returned as errors; callers on the
    /// startup path degrade those to "absent" with a warning.
    pub async fn load(cfg: IndexConfig) -> Result<Option<Self>, IndexError> {
        cfg.validate()?;

        let Some(manifest) = IndexManifest::load(&cfg.index_dir)? else {
            info!("no index manifest under {}", cfg.index_dir.display());
            return Ok(None);
        };

        let facade = QdrantFacade::new(&cfg)?;
        if !facade.collection_exists(&manifest.collection).await? {
            warn!(
                "manifest points at missing collection '{}'; treating index as absent",
                manifest.collection
            );
            return Ok(None);
        }

        let index = Self {
            cfg,
            facade,
            manifest,
        };
        let points = index.len().await.unwrap_or(0);
        info!(
            "vector index loaded: collection='{}' points={}",
            index.manifest.collection, points
        );

        Ok(Some(index))
    }

    /// Builds a fresh index from `chunks`, replacing any prior index.
    ///
    /// The new generation is ingested completely before the manifest is
    /// committed; the previous generation's collection is dropped last, and a
    /// failure to drop it is only a warning (orphaned data, not corruption).
    ///
    /// # Errors
    /// Returns embedding or storage errors; on error the previous index (if
    /// any) remains live.
    pub async fn create(
        cfg: IndexConfig,
        chunks: &[ChunkRecord],
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Self, IndexError> {
        cfg.validate()?;

        let prev = match IndexManifest::load(&cfg.index_dir) {
            Ok(m) => m,
            Err(e) => {
                warn!("unreadable index manifest, starting from generation 1: {e}");
                None
            }
        };
        let generation = prev.as_ref().map(|m| m.generation + 1).unwrap_or(1);
        let collection = format!("{}_v{}", cfg.collection, generation);

        let facade = QdrantFacade::new(&cfg)?;

        // A build that crashed before its manifest commit leaves this
        // generation's collection behind with stale points; start clean.
        if facade.collection_exists(&collection).await? {
            warn!("dropping leftover collection '{}' from an aborted build", collection);
            facade.delete_collection(&collection).await?;
        }

        let ingested = ingest(&facade, &cfg, &collection, chunks, provider).await?;
        info!(
            "index built: collection='{}' generation={} chunks={}",
            collection, generation, ingested
        );

        let manifest = IndexManifest {
            generation,
            collection: collection.clone(),
        };
        manifest.store(&cfg.index_dir)?;

        if let Some(old) = prev {
            if old.collection != collection {
                if let Err(e) = facade.delete_collection(&old.collection).await {
                    warn!("failed to drop old collection '{}': {e}", old.collection);
                }
            }
        }

        Ok(Self {
            cfg,
            facade,
            manifest,
        })
    }

    /// Appends chunks to the live index, embedding and persisting in batches
    /// so a crash mid-ingest loses at most one partial batch.
    ///
    /// # Errors
    /// Returns embedding or storage errors; already-persisted batches stay.
    pub async fn add(
        &self,
        chunks: &[ChunkRecord],
        provider: &dyn EmbeddingsProvider,
    ) -> Result<usize, IndexError> {
        ingest(&self.facade, &self.cfg, &self.manifest.collection, chunks, provider).await
    }

    /// Embeds the query and returns the `top_k` nearest chunks, best-first.
    ///
    /// Fails soft: if the backing collection has disappeared, returns an
    /// empty sequence instead of an error.
    pub async fn search(
        &self,
        query: &str,
        top_k: u64,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        match self.facade.collection_exists(&self.manifest.collection).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    "collection '{}' is gone; returning no hits",
                    self.manifest.collection
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("index access failed, degrading to no hits: {e}");
                return Ok(Vec::new());
            }
        }

        let query_vector = provider.embed(query).await?;
        let hits = self
            .facade
            .search(
                &self.manifest.collection,
                query_vector,
                top_k,
                self.cfg.exact_search,
            )
            .await?;

        let mut out = Vec::with_capacity(hits.len());
        for (score, payload) in hits {
            let text = payload
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let source = payload
                .get("source")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            out.push(ScoredChunk {
                score,
                text,
                source,
            });
        }

        debug!("search returned {} hits", out.len());
        Ok(out)
    }

    /// Number of points in the live collection.
    pub async fn len(&self) -> Result<u64, IndexError> {
        self.facade.points_count(&self.manifest.collection).await
    }

    /// Drops the index entirely: collection and manifest. Used when the last
    /// document is removed from the corpus.
    pub async fn destroy(self) -> Result<(), IndexError> {
        self.facade.delete_collection(&self.manifest.collection).await?;
        IndexManifest::remove(&self.cfg.index_dir)?;
        info!("vector index destroyed: '{}'", self.manifest.collection);
        Ok(())
    }
}

/// Embeds and upserts `chunks` into `collection` in `cfg.upsert_batch`-sized
/// batches, persisting after each batch.
async fn ingest(
    facade: &QdrantFacade,
    cfg: &IndexConfig,
    collection: &str,
    chunks: &[ChunkRecord],
    provider: &dyn EmbeddingsProvider,
) -> Result<usize, IndexError> {
    if chunks.is_empty() {
        debug!("no chunks to ingest");
        return Ok(0);
    }

    let dim = determine_vector_size(chunks, provider, cfg.embedding_dim).await?;
    debug!("vector size determined: {}", dim);

    facade
        .ensure_collection(
            collection,
            &VectorSpace {
                size: dim,
                distance: cfg.distance,
            },
        )
        .await?;

    let batch_size = cfg.upsert_batch.max(1);
    let concurrency = cfg.embedding_concurrency.unwrap_or(4);

    let total_batches = chunks.len().div_ceil(batch_size);
    let pb = ProgressBar::new(total_batches as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-"),
    );

    let mut total = 0usize;
    for batch in chunks.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|r| r.text.clone()).collect();
        let vectors = embed_all(&texts, provider, EMBED_CALL_BATCH, concurrency, Some(dim)).await?;
        let points = build_points(batch, &vectors);
        total += facade.upsert_points(collection, points).await? as usize;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("ingested {} chunks into '{}'", total, collection);
    Ok(total)
}

/// Determines the embedding dimensionality from config or by probing the
/// provider with the first chunk.
async fn determine_vector_size(
    chunks: &[ChunkRecord],
    provider: &dyn EmbeddingsProvider,
    expected_dim: Option<usize>,
) -> Result<usize, IndexError> {
    if let Some(dim) = expected_dim {
        return Ok(dim);
    }
    let v = provider.embed(&chunks[0].text).await?;
    Ok(v.len())
}

/// Builds Qdrant points for one batch. Payload is compact: chunk text plus
/// the source document name.
fn build_points(batch: &[ChunkRecord], vectors: &[Vec<f32>]) -> Vec<PointStruct> {
    let mut pts = Vec::with_capacity(batch.len());

    for (record, vector) in batch.iter().zip(vectors.iter()) {
        let mut payload: HashMap<String, QValue> = HashMap::new();
        payload.insert("text".into(), qstring(&record.text));
        if let Some(src) = &record.source {
            payload.insert("source".into(), qstring(src));
        }

        let pid: PointId = stable_uuid(&record.id).to_string().into();

        let vectors = Vectors {
            vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
                data: vector.clone(),
                indices: None,
                vectors_count: None,
                vector: None,
            })),
        };

        pts.push(PointStruct {
            id: Some(pid),
            payload,
            vectors: Some(vectors),
            ..Default::default()
        });
    }

    pts
}

/// Wraps a string into Qdrant `Value`.
fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}
