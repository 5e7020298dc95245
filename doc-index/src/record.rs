//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One text chunk queued for indexing.
///
/// Chunks carry no persistent identity beyond their text and derived id; they
/// are append-only members of the index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Deterministic id derived from source, sequence number, and text.
    pub id: String,
    /// Chunk text (embedded and stored as payload).
    pub text: String,
    /// Display identifier of the source document (filename).
    pub source: Option<String>,
}

impl ChunkRecord {
    /// Builds a record with a stable id.
    ///
    /// Re-ingesting the same document yields the same ids, so duplicate adds
    /// overwrite points instead of multiplying them.
    pub fn new(source: &str, seq: usize, text: String) -> Self {
        let id = stable_uuid(&format!("{source}#{seq}#{text}")).to_string();
        Self {
            id,
            text,
            source: Some(source.to_string()),
        }
    }
}

/// A single retrieval hit with score, text and source.
#[derive(Clone, Debug)]
pub struct ScoredChunk {
    pub score: f32,
    pub text: String,
    pub source: Option<String>,
}

/// Deterministic UUIDv5 from an arbitrary string id.
pub(crate) fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_distinct() {
        let a = ChunkRecord::new("doc.pdf", 0, "hello".into());
        let b = ChunkRecord::new("doc.pdf", 0, "hello".into());
        let c = ChunkRecord::new("doc.pdf", 1, "hello".into());
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }
}
