//! Durable admin capability set.
//!
//! A flat JSON record (`{"admins": [id, ...]}`) holding the user identifiers
//! with elevated capability. The record is re-read on every check so external
//! edits take effect without a restart. Read-modify-write is not atomic
//! across concurrent callers; mutating calls are expected to be serialized by
//! the same discipline as the pipeline's mutating operations.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::PipelineError;

/// On-disk shape of the admin record.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AdminRecord {
    admins: Vec<i64>,
}

/// Admin set backed by a single JSON file.
pub struct AdminStore {
    path: PathBuf,
}

impl AdminStore {
    /// Creates a store over the given record path. The file is created lazily
    /// on the first mutation.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whether `user_id` holds the admin capability.
    ///
    /// An unreadable record degrades to `false` with a warning: a broken
    /// admin file must never grant access.
    pub fn is_admin(&self, user_id: i64) -> bool {
        match self.load() {
            Ok(record) => record.admins.contains(&user_id),
            Err(e) => {
                warn!("admin record unreadable, denying {user_id}: {e}");
                false
            }
        }
    }

    /// Grants the capability; adding an existing id is a no-op.
    ///
    /// # Errors
    /// Returns I/O or serialization errors.
    pub fn add_admin(&self, user_id: i64) -> Result<(), PipelineError> {
        let mut record = self.load()?;
        if !record.admins.contains(&user_id) {
            record.admins.push(user_id);
            self.store(&record)?;
        }
        Ok(())
    }

    /// Revokes the capability; removing an absent id is a no-op.
    ///
    /// # Errors
    /// Returns I/O or serialization errors.
    pub fn remove_admin(&self, user_id: i64) -> Result<(), PipelineError> {
        let mut record = self.load()?;
        let before = record.admins.len();
        record.admins.retain(|id| *id != user_id);
        if record.admins.len() != before {
            self.store(&record)?;
        }
        Ok(())
    }

    /// All ids currently holding the capability.
    pub fn admins(&self) -> Vec<i64> {
        self.load().map(|r| r.admins).unwrap_or_default()
    }

    fn load(&self) -> Result<AdminRecord, PipelineError> {
        if !self.path.exists() {
            return Ok(AdminRecord::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn store(&self, record: &AdminRecord) -> Result<(), PipelineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> AdminStore {
        AdminStore::new(dir.path().join("admins.json"))
    }

    #[test]
    fn grant_and_revoke() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(!store.is_admin(42));
        store.add_admin(42).unwrap();
        assert!(store.is_admin(42));
        store.remove_admin(42).unwrap();
        assert!(!store.is_admin(42));
    }

    #[test]
    fn remove_of_absent_id_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.remove_admin(7).unwrap();
        assert!(!store.is_admin(7));
    }

    #[test]
    fn double_add_keeps_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add_admin(1).unwrap();
        store.add_admin(1).unwrap();
        assert_eq!(store.admins(), vec![1]);
    }

    #[test]
    fn record_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir).add_admin(99).unwrap();
        assert!(store_in(&dir).is_admin(99));
    }

    #[test]
    fn broken_record_denies_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admins.json");
        fs::write(&path, b"not json").unwrap();
        assert!(!AdminStore::new(path).is_admin(1));
    }
}
