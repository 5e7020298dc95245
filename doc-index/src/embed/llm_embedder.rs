//! Embedding provider backed by the shared LLM service.

use std::sync::Arc;

use llm_service::LlmProfiles;

use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;

/// Adapter over the process-wide [`LlmProfiles`] handle.
///
/// Holds an `Arc` clone of the single service instance; no model state of its
/// own. Enforces the expected embedding dimension when one is configured.
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmProfiles>,
    dim: Option<usize>,
}

impl LlmEmbedder {
    /// Constructs a new embedder over the shared service.
    pub fn new(svc: Arc<LlmProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }

    fn check_dim(&self, v: &[f32]) -> Result<(), IndexError> {
        if let Some(want) = self.dim {
            if v.len() != want {
                return Err(IndexError::VectorSizeMismatch {
                    got: v.len(),
                    want,
                });
            }
        }
        Ok(())
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>
    {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;
            self.check_dim(&v)?;
            Ok(v)
        })
    }

    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let vecs = self.svc.embed_batch(texts).await?;
            for v in &vecs {
                self.check_dim(v)?;
            }
            Ok(vecs)
        })
    }
}
