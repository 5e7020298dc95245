//! Index manifest: records which physical collection generation is live.
//!
//! The manifest is the commit point of a rebuild. A new generation is only
//! referenced here after it has been fully built, so a crash mid-rebuild
//! leaves the previous generation live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::IndexError;

const MANIFEST_FILE: &str = "index_manifest.json";

/// Durable record of the live index generation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexManifest {
    /// Monotonic rebuild counter.
    pub generation: u64,
    /// Physical Qdrant collection name for this generation.
    pub collection: String,
}

impl IndexManifest {
    /// Manifest path under the index directory.
    pub fn path(index_dir: &Path) -> PathBuf {
        index_dir.join(MANIFEST_FILE)
    }

    /// Loads the manifest, returning `Ok(None)` if none exists.
    ///
    /// # Errors
    /// Returns I/O or parse errors for an unreadable manifest; callers on the
    /// load path degrade this to "index absent" rather than propagating.
    pub fn load(index_dir: &Path) -> Result<Option<Self>, IndexError> {
        let path = Self::path(index_dir);
        if !path.exists() {
            trace!("no index manifest at {}", path.display());
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        let manifest = serde_json::from_str(&raw)?;
        Ok(Some(manifest))
    }

    /// Persists the manifest atomically (temp file + rename).
    ///
    /// # Errors
    /// Returns I/O or serialization errors.
    pub fn store(&self, index_dir: &Path) -> Result<(), IndexError> {
        fs::create_dir_all(index_dir)?;
        let path = Self::path(index_dir);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, &path)?;
        trace!("index manifest committed: generation={}", self.generation);
        Ok(())
    }

    /// Removes the manifest; absence is not an error.
    pub fn remove(index_dir: &Path) -> Result<(), IndexError> {
        let path = Self::path(index_dir);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        assert!(IndexManifest::load(dir.path()).unwrap().is_none());

        let m = IndexManifest {
            generation: 3,
            collection: "docs_v3".into(),
        };
        m.store(dir.path()).unwrap();
        assert_eq!(IndexManifest::load(dir.path()).unwrap(), Some(m));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        IndexManifest::remove(dir.path()).unwrap();

        let m = IndexManifest {
            generation: 1,
            collection: "docs_v1".into(),
        };
        m.store(dir.path()).unwrap();
        IndexManifest::remove(dir.path()).unwrap();
        assert!(IndexManifest::load(dir.path()).unwrap().is_none());
        IndexManifest::remove(dir.path()).unwrap();
    }
}
