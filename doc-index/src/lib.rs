//! Document ingestion and retrieval over Qdrant.
//!
//! This crate provides the storage half of a RAG pipeline:
//! - Extract page-marked plain text from source documents ([`loader`])
//! - Split text into overlapping, embedding-sized chunks ([`splitter`])
//! - Resolve embeddings through a pluggable provider ([`embed`])
//! - Maintain a persistent vector index with generation-swapped rebuilds
//!   ([`DocIndex`])
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules.

mod config;
mod embed_pool;
mod errors;
mod index;
mod manifest;
mod qdrant_facade;
mod record;

pub mod embed;
pub mod loader;
pub mod splitter;

pub use config::{DistanceKind, IndexConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, llm_embedder::LlmEmbedder};
pub use errors::IndexError;
pub use index::DocIndex;
pub use record::{ChunkRecord, ScoredChunk};
