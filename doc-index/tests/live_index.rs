//! Index behavior against a running Qdrant instance.
//!
//! These tests need Qdrant listening at `QDRANT_TEST_URL` (default
//! `http://localhost:6334`) and are ignored by default:
//!
//! ```bash
//! cargo test -p doc-index -- --ignored
//! ```

use std::path::Path;
use std::{future::Future, pin::Pin};

use doc_index::{ChunkRecord, DocIndex, EmbeddingsProvider, IndexConfig, IndexError};

/// Deterministic offline provider: vector = [char count, 1.0].
struct CharCountProvider;

impl EmbeddingsProvider for CharCountProvider {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async move { Ok(vec![text.chars().count() as f32, 1.0]) })
    }

    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send + 'a>> {
        Box::pin(async move {
            Ok(texts
                .iter()
                .map(|t| vec![t.chars().count() as f32, 1.0])
                .collect())
        })
    }
}

fn live_cfg(collection: &str, index_dir: &Path) -> IndexConfig {
    let url =
        std::env::var("QDRANT_TEST_URL").unwrap_or_else(|_| "http://localhost:6334".to_string());
    let mut cfg = IndexConfig::new_default(url, collection, index_dir);
    cfg.embedding_dim = Some(2);
    cfg
}

fn chunks(texts: &[&str]) -> Vec<ChunkRecord> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| ChunkRecord::new("live.pdf", i, t.to_string()))
        .collect()
}

#[tokio::test]
#[ignore = "requires a running Qdrant instance"]
async fn create_drops_leftovers_from_an_aborted_build() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = live_cfg("docqa_live_aborted", dir.path());

    let idx = DocIndex::create(cfg.clone(), &chunks(&["one", "two", "three"]), &CharCountProvider)
        .await
        .unwrap();
    assert_eq!(idx.len().await.unwrap(), 3);

    // Roll the manifest commit back, as a crash between build and commit
    // would. The next create targets the same generation.
    std::fs::remove_file(dir.path().join("index_manifest.json")).unwrap();

    let idx = DocIndex::create(cfg, &chunks(&["four"]), &CharCountProvider)
        .await
        .unwrap();
    assert_eq!(idx.len().await.unwrap(), 1, "stale points must not survive");

    idx.destroy().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Qdrant instance"]
async fn search_returns_at_most_k_hits_best_first() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = live_cfg("docqa_live_search", dir.path());

    let idx = DocIndex::create(
        cfg,
        &chunks(&["a", "bbb", "ccccc", "ddddddd", "eeeeeeeee"]),
        &CharCountProvider,
    )
    .await
    .unwrap();

    let hits = idx.search("query", 3, &CharCountProvider).await.unwrap();
    assert!(hits.len() <= 3);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));

    idx.destroy().await.unwrap();
}
