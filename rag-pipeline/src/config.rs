//! Storage profile and env-driven index configuration.
//!
//! The storage profile is resolved exactly once at startup and passed to the
//! pipeline as plain paths; core logic never inspects the environment to
//! decide where to read or write.

use std::fs;
use std::path::PathBuf;

use doc_index::IndexConfig;
use llm_service::error_handler::{env_opt, env_opt_usize};
use tracing::info;

use crate::errors::PipelineError;

/// Default Qdrant HTTP endpoint.
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
/// Default logical collection base name.
const DEFAULT_COLLECTION: &str = "docqa_chunks";

/// Filesystem roots for the pipeline's durable state.
#[derive(Clone, Debug)]
pub struct StorageProfile {
    /// Corpus directory: one source file per document, filename is the
    /// display identifier. Sole store of truth; the index is derived.
    pub docs_dir: PathBuf,
    /// Index directory (manifest); owned by `doc-index`.
    pub index_dir: PathBuf,
    /// Admin record path.
    pub admins_file: PathBuf,
}

impl StorageProfile {
    /// Resolves the profile from env with local-data defaults.
    ///
    /// # Env
    /// - `DOCS_DIR`    (default `data/documents`)
    /// - `INDEX_DIR`   (default `data/index`)
    /// - `ADMINS_FILE` (default `data/admins.json`)
    pub fn from_env() -> Self {
        let profile = Self {
            docs_dir: env_opt("DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/documents")),
            index_dir: env_opt("INDEX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/index")),
            admins_file: env_opt("ADMINS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/admins.json")),
        };
        info!(
            "storage profile: docs={} index={}",
            profile.docs_dir.display(),
            profile.index_dir.display()
        );
        profile
    }

    /// Creates the backing directories if missing.
    ///
    /// # Errors
    /// Returns I/O errors from directory creation.
    pub fn ensure_dirs(&self) -> Result<(), PipelineError> {
        fs::create_dir_all(&self.docs_dir)?;
        fs::create_dir_all(&self.index_dir)?;
        if let Some(parent) = self.admins_file.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Builds the vector index configuration from env.
///
/// # Env
/// - `QDRANT_URL`        (default `http://localhost:6334`)
/// - `QDRANT_API_KEY`    (optional)
/// - `QDRANT_COLLECTION` (default `docqa_chunks`)
/// - `EMBEDDING_DIM`     (optional; probed from the provider when unset)
///
/// # Errors
/// Returns [`PipelineError::Config`] for unparseable numeric variables.
pub fn index_config_from_env(profile: &StorageProfile) -> Result<IndexConfig, PipelineError> {
    let url = env_opt("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string());
    let collection = env_opt("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

    let mut cfg = IndexConfig::new_default(url, collection, profile.index_dir.clone());
    cfg.qdrant_api_key = env_opt("QDRANT_API_KEY");
    cfg.embedding_dim =
        env_opt_usize("EMBEDDING_DIM").map_err(|e| PipelineError::Config(e.to_string()))?;
    Ok(cfg)
}
