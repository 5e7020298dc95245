//! Embedding executor with concurrency and dimension checks.

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;

/// Embeds `texts` through the provider, `call_batch` texts per HTTP call and
/// up to `concurrency` calls in flight. Results come back in input order.
///
/// # Errors
/// Returns [`IndexError::VectorSizeMismatch`] if `expected_dim` is set and a
/// vector disagrees, or the provider's error otherwise.
pub async fn embed_all(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    call_batch: usize,
    concurrency: usize,
    expected_dim: Option<usize>,
) -> Result<Vec<Vec<f32>>, IndexError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        "embed_pool::embed_all: total={} call_batch={} concurrency={}",
        texts.len(),
        call_batch,
        concurrency
    );

    let call_batch = call_batch.max(1);
    let batches: Vec<(usize, &[String])> = texts
        .chunks(call_batch)
        .enumerate()
        .map(|(i, slice)| (i * call_batch, slice))
        .collect();

    let results: Vec<(usize, Vec<Vec<f32>>)> = stream::iter(batches.into_iter())
        .map(|(start, slice)| async move {
            let vecs = provider.embed_batch(slice).await?;
            Ok::<(usize, Vec<Vec<f32>>), IndexError>((start, vecs))
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, IndexError>>()?;

    let mut out: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
    for (start, vecs) in results {
        for (offset, v) in vecs.into_iter().enumerate() {
            if let Some(want) = expected_dim {
                if v.len() != want {
                    return Err(IndexError::VectorSizeMismatch { got: v.len(), want });
                }
            }
            if let Some(slot) = out.get_mut(start + offset) {
                *slot = Some(v);
            }
        }
    }

    out.into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| {
                IndexError::Config(format!("provider returned no vector for input {i}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbeddingsProvider;
    use std::{future::Future, pin::Pin};

    /// Deterministic offline provider: vector = [char count, batch-agnostic].
    struct FakeProvider;

    impl EmbeddingsProvider for FakeProvider {
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

    #[tokio::test]
    async fn preserves_input_order_across_batches() {
        let texts: Vec<String> = (0..25).map(|i| "x".repeat(i + 1)).collect();
        let out = embed_all(&texts, &FakeProvider, 4, 3, Some(2)).await.unwrap();
        assert_eq!(out.len(), texts.len());
        for (i, v) in out.iter().enumerate() {
            assert_eq!(v[0] as usize, i + 1);
        }
    }

    #[tokio::test]
    async fn enforces_expected_dim() {
        let texts = vec!["a".to_string()];
        let err = embed_all(&texts, &FakeProvider, 4, 1, Some(3))
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::VectorSizeMismatch { got: 2, want: 3 }));
    }

    #[tokio::test]
    async fn empty_input_is_noop() {
        let out = embed_all(&[], &FakeProvider, 4, 2, None).await.unwrap();
        assert!(out.is_empty());
    }
}
