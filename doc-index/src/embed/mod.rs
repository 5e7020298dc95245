//! Embedding provider seam.
//!
//! Async is required because real providers (Ollama, OpenAI, etc.) perform
//! HTTP requests. Implement [`EmbeddingsProvider`] to plug in a different
//! embedding backend.

use std::{future::Future, pin::Pin};

use crate::errors::IndexError;

/// Provider interface for embedding generation.
///
/// Both methods are deterministic for a fixed model identifier: the same text
/// always maps to the same vector.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds a single text.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;

    /// Embeds a batch of texts, returning one vector per input in input order.
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send + 'a>>;
}

pub mod llm_embedder;
