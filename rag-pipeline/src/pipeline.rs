//! Pipeline orchestrator.
//!
//! Composes the corpus store, loader, splitter, vector index, and answer
//! synthesis into the top-level operations. Mutating operations report
//! success as booleans so a transport in front of this crate can relay a
//! plain "done / failed" without unpacking component errors; the query path
//! propagates synthesis errors, since there is no honest fallback text.
//!
//! The index handle lives behind an async `RwLock<Option<..>>`: queries take
//! a read lock, mutating operations a write lock, which serializes rebuilds
//! against each other and against in-flight searches.

use std::path::Path;
use std::sync::Arc;

use doc_index::{
    ChunkRecord, DocIndex, IndexConfig, LlmEmbedder,
    loader::load_document,
    splitter::{overlap_for, split_text, target_size_for},
};
use llm_service::LlmProfiles;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::answer;
use crate::config::StorageProfile;
use crate::corpus;
use crate::errors::PipelineError;

/// Reply for queries against an empty corpus; emitted without calling the
/// retriever or the generator.
pub const NO_DOCUMENTS_MESSAGE: &str =
    "No documents available. Please upload a document first.";

/// Chunks retrieved per query.
const DEFAULT_TOP_K: u64 = 6;

/// Orchestrator over the document corpus and its derived vector index.
pub struct RagPipeline {
    profile: StorageProfile,
    index_cfg: IndexConfig,
    svc: Arc<LlmProfiles>,
    embedder: LlmEmbedder,
    index: RwLock<Option<DocIndex>>,
}

impl RagPipeline {
    /// Builds the pipeline without touching the vector store. Call
    /// [`Self::load_index`] afterwards to attach a persisted index.
    pub fn new(profile: StorageProfile, index_cfg: IndexConfig, svc: Arc<LlmProfiles>) -> Self {
        let embedder = LlmEmbedder::new(svc.clone(), index_cfg.embedding_dim);
        Self {
            profile,
            index_cfg,
            svc,
            embedder,
            index: RwLock::new(None),
        }
    }

    /// Attaches a previously persisted index, if one exists.
    ///
    /// Absence and load failures both leave the pipeline serving the
    /// no-documents reply; a failure is only a warning since the index can be
    /// rebuilt from the corpus at any time.
    pub async fn load_index(&self) {
        match DocIndex::load(self.index_cfg.clone()).await {
            Ok(Some(idx)) => {
                *self.index.write().await = Some(idx);
            }
            Ok(None) => {
                info!("no persisted index; waiting for first document");
            }
            Err(e) => {
                warn!("index load failed, starting without an index: {e}");
            }
        }
    }

    /// Answers `question` from the indexed corpus.
    ///
    /// With no index attached the fixed no-documents reply is returned
    /// immediately. Retrieval failures degrade to an empty context, in which
    /// case the generator emits its fallback sentence.
    ///
    /// # Errors
    /// Propagates generation failures.
    pub async fn query(&self, question: &str) -> Result<String, PipelineError> {
        let contexts = {
            let guard = self.index.read().await;
            let Some(idx) = guard.as_ref() else {
                return Ok(NO_DOCUMENTS_MESSAGE.to_string());
            };
            let hits = idx.search(question, DEFAULT_TOP_K, &self.embedder).await?;
            hits.into_iter().map(|h| h.text).collect::<Vec<_>>()
        };

        debug!("retrieved {} context chunks", contexts.len());
        Ok(answer::synthesize(&self.svc, question, &contexts).await?)
    }

    /// Indexes one document that is already present in the corpus directory.
    ///
    /// Appends to the live index, or builds the first index generation when
    /// none exists yet. Returns whether the document was indexed.
    pub async fn add_document(&self, path: &Path) -> bool {
        match self.add_document_inner(path).await {
            Ok(chunks) => {
                info!("indexed {} ({} chunks)", path.display(), chunks);
                true
            }
            Err(e) => {
                warn!("failed to index {}: {e}", path.display());
                false
            }
        }
    }

    async fn add_document_inner(&self, path: &Path) -> Result<usize, PipelineError> {
        let chunks = chunk_document(path)?;
        let count = chunks.len();

        let mut slot = self.index.write().await;
        match slot.as_ref() {
            Some(idx) => {
                idx.add(&chunks, &self.embedder).await?;
            }
            None => {
                let idx = DocIndex::create(self.index_cfg.clone(), &chunks, &self.embedder).await?;
                *slot = Some(idx);
            }
        }
        Ok(count)
    }

    /// Rebuilds the index from scratch over every document in the corpus.
    ///
    /// The previous index stays live until the replacement is fully built.
    /// Documents that fail to load are skipped with a warning; the rebuild
    /// fails only when the corpus is empty or nothing could be chunked.
    pub async fn rebuild_index(&self) -> bool {
        let mut slot = self.index.write().await;

        let docs = match corpus::list_documents(&self.profile.docs_dir) {
            Ok(docs) => docs,
            Err(e) => {
                warn!("cannot list corpus: {e}");
                return false;
            }
        };
        if docs.is_empty() {
            warn!("rebuild requested with an empty corpus");
            return false;
        }

        let mut chunks = Vec::new();
        for doc in &docs {
            match chunk_document(doc) {
                Ok(mut c) => chunks.append(&mut c),
                Err(e) => warn!("skipping {}: {e}", doc.display()),
            }
        }
        if chunks.is_empty() {
            warn!("no indexable text in {} documents", docs.len());
            return false;
        }

        match DocIndex::create(self.index_cfg.clone(), &chunks, &self.embedder).await {
            Ok(idx) => {
                info!("rebuilt index: {} documents, {} chunks", docs.len(), chunks.len());
                *slot = Some(idx);
                true
            }
            Err(e) => {
                warn!("rebuild failed, previous index stays live: {e}");
                false
            }
        }
    }

    /// Removes a document from the corpus and brings the index in line:
    /// rebuilds over the remainder, or destroys the index when the corpus
    /// becomes empty. Returns whether the document existed.
    pub async fn remove_document(&self, name: &str) -> bool {
        {
            let _guard = self.index.write().await;
            match corpus::remove_document(&self.profile.docs_dir, name) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    warn!("failed to remove {name}: {e}");
                    return false;
                }
            }
        }

        let remaining = corpus::list_documents(&self.profile.docs_dir)
            .map(|d| d.len())
            .unwrap_or(0);
        if remaining == 0 {
            let mut slot = self.index.write().await;
            if let Some(idx) = slot.take() {
                if let Err(e) = idx.destroy().await {
                    warn!("failed to destroy index for empty corpus: {e}");
                }
            }
            return true;
        }

        self.rebuild_index().await
    }

    /// Display names of the corpus documents.
    ///
    /// # Errors
    /// Returns I/O errors from the corpus store.
    pub fn list_documents(&self) -> Result<Vec<String>, PipelineError> {
        corpus::document_names(&self.profile.docs_dir)
    }
}

/// Loads one document and splits it into chunk records, with the chunk size
/// adapted to the document's length.
fn chunk_document(path: &Path) -> Result<Vec<ChunkRecord>, PipelineError> {
    let text = load_document(path)?;

    let target = target_size_for(text.chars().count());
    let overlap = overlap_for(target);
    let pieces = split_text(&text, target, overlap);
    if pieces.is_empty() {
        return Err(PipelineError::EmptyDocument(path.display().to_string()));
    }

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(pieces
        .into_iter()
        .enumerate()
        .map(|(seq, chunk)| ChunkRecord::new(&source, seq, chunk))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use llm_service::{LlmModelConfig, LlmProvider};

    fn test_pipeline(dir: &tempfile::TempDir) -> RagPipeline {
        let profile = StorageProfile {
            docs_dir: dir.path().join("docs"),
            index_dir: dir.path().join("index"),
            admins_file: dir.path().join("admins.json"),
        };
        profile.ensure_dirs().unwrap();

        let model = |m: &str| LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: m.to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(5),
        };
        let svc = Arc::new(LlmProfiles::new(model("gen"), model("embed")).unwrap());

        let cfg = IndexConfig::new_default(
            "http://localhost:6334".to_string(),
            "test_chunks".to_string(),
            profile.index_dir.clone(),
        );
        RagPipeline::new(profile, cfg, svc)
    }

    #[tokio::test]
    async fn query_without_index_returns_fixed_reply() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&dir);
        let reply = pipeline.query("anything").await.unwrap();
        assert_eq!(reply, NO_DOCUMENTS_MESSAGE);
    }

    #[tokio::test]
    async fn add_of_unreadable_document_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&dir);
        let missing = dir.path().join("docs").join("missing.pdf");
        assert!(!pipeline.add_document(&missing).await);
    }

    #[tokio::test]
    async fn rebuild_over_empty_corpus_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&dir);
        assert!(!pipeline.rebuild_index().await);
    }

    #[tokio::test]
    async fn remove_of_unknown_document_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&dir);
        assert!(!pipeline.remove_document("nope.pdf").await);
    }

    #[test]
    fn listing_reflects_corpus_contents() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&dir);
        std::fs::write(dir.path().join("docs").join("guide.pdf"), b"x").unwrap();
        assert_eq!(pipeline.list_documents().unwrap(), vec!["guide.pdf"]);
    }
}
