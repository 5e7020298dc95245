//! RAG orchestration over a private document corpus.
//!
//! The [`pipeline::RagPipeline`] facade composes loading, chunking, the
//! vector index, and answer synthesis into the top-level operations
//! (`query`, `add_document`, `rebuild_index`) plus corpus maintenance.
//! The admin capability store ([`admin::AdminStore`]) lives here too; the
//! transport layer in front of this crate is expected to call `is_admin`
//! before invoking any mutating operation.

pub mod admin;
pub mod answer;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod pipeline;

pub use admin::AdminStore;
pub use answer::FALLBACK_ANSWER;
pub use config::StorageProfile;
pub use errors::PipelineError;
pub use pipeline::{NO_DOCUMENTS_MESSAGE, RagPipeline};
