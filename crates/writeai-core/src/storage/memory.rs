//! In-memory snapshot storage
//!
//! Keeps the serialized snapshot in a shared slot instead of a file. Clones
//! share the same slot, so a store can be "reopened" against it; tests use
//! this to check reload behaviour without touching the filesystem.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::{StorageError, StorageResult};
use super::ProjectStorage;
use crate::models::Project;

/// Shared in-memory slot holding the serialized project list
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw slot contents, which need not be valid
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.lock() = Some(raw.into());
        storage
    }

    /// Current raw slot contents
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Number of snapshots written so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // A panic while holding the lock cannot leave a half-written String
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProjectStorage for MemoryStorage {
    fn load(&self) -> StorageResult<Option<Vec<Project>>> {
        let guard = self.lock();
        let Some(raw) = guard.as_deref() else {
            return Ok(None);
        };

        serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| StorageError::InvalidFormat {
                path: PathBuf::from("memory"),
                details: e.to_string(),
            })
    }

    fn save(&self, projects: &[Project]) -> StorageResult<()> {
        let raw = serde_json::to_string(projects)?;
        *self.lock() = Some(raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectType;

    #[test]
    fn test_empty_slot_loads_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        let project = Project::new("Shared", "text", ProjectType::Article);
        storage.save(std::slice::from_ref(&project)).unwrap();

        assert_eq!(other.load().unwrap().unwrap(), vec![project]);
        assert_eq!(other.write_count(), 1);
    }

    #[test]
    fn test_malformed_slot() {
        let storage = MemoryStorage::with_raw("[{\"id\": 42}]");
        let err = storage.load().unwrap_err();
        assert!(err.is_malformed());
    }
}
