//! Pipeline-level error type.
//!
//! Component errors are caught at the orchestrator boundary and converted to
//! booleans for the mutating operations; query-path errors propagate, since
//! there is no safe fallback text better than an explicit error.

use thiserror::Error;

/// Top-level error for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O or filesystem errors (corpus store, admin record).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors (admin record).
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Vector index failures (load, ingest, search).
    #[error(transparent)]
    Index(#[from] doc_index::IndexError),

    /// Generative model call failed; no automatic retry is performed.
    #[error(transparent)]
    Synthesis(#[from] llm_service::LlmError),

    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A document yielded no indexable text.
    #[error("document produced no chunks: {0}")]
    EmptyDocument(String),
}
