//! Project snapshot persistence
//!
//! Saves the whole project collection as one JSON array and reads it back at
//! startup. Writes are atomic (temp file, fsync, rename) so a crash never
//! leaves a half-written snapshot behind.
//!
//! Storage location: `~/.local/share/writeai/writeai_projects.json`
//! (configurable via `Config`)

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::ProjectStorage;
use crate::config::Config;
use crate::models::Project;

/// Suffix appended to a snapshot that failed to parse
const CORRUPT_BACKUP_SUFFIX: &str = "corrupt.backup";

/// File-backed snapshot storage
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Store the snapshot at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the snapshot in the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.projects_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove the stored snapshot
    pub fn delete(&self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StorageError::from_io(e, self.path.clone()))?;
        }
        Ok(())
    }

    /// Move an unreadable snapshot aside so the next save does not clobber it
    fn back_up_corrupt(&self, details: String) -> StorageError {
        let backup_path = corrupt_backup_path(&self.path);
        match fs::rename(&self.path, &backup_path) {
            Ok(()) => {
                warn!(path = ?self.path, backup = ?backup_path, "moved corrupt snapshot aside");
                StorageError::CorruptSnapshot {
                    path: self.path.clone(),
                    backup_path,
                    details,
                }
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "could not back up corrupt snapshot");
                StorageError::InvalidFormat {
                    path: self.path.clone(),
                    details,
                }
            }
        }
    }
}

impl ProjectStorage for JsonFileStorage {
    fn load(&self) -> StorageResult<Option<Vec<Project>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        match serde_json::from_slice::<Vec<Project>>(&bytes) {
            Ok(projects) => {
                debug!(path = ?self.path, count = projects.len(), "loaded project snapshot");
                Ok(Some(projects))
            }
            Err(e) => Err(self.back_up_corrupt(e.to_string())),
        }
    }

    fn save(&self, projects: &[Project]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(projects)?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = ?self.path, count = projects.len(), "saved project snapshot");
        Ok(())
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(CORRUPT_BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::Replace {
        temp: temp_path.clone(),
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectType;
    use tempfile::TempDir;

    fn test_storage(temp_dir: &TempDir) -> JsonFileStorage {
        JsonFileStorage::new(temp_dir.path().join("writeai_projects.json"))
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);

        // Initially no snapshot
        assert!(!storage.exists());
        assert!(storage.load().unwrap().is_none());

        let mut project = Project::new("The Draft", "It was a dark night", ProjectType::Story);
        project.add_tag("noir");
        storage.save(std::slice::from_ref(&project)).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, vec![project]);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);

        let projects: Vec<Project> = (0..5)
            .map(|i| Project::new(format!("Project {}", i), "body text", ProjectType::Other))
            .collect();
        storage.save(&projects).unwrap();

        assert_eq!(storage.load().unwrap().unwrap(), projects);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);

        storage
            .save(&[
                Project::new("One", "", ProjectType::Other),
                Project::new("Two", "", ProjectType::Other),
            ])
            .unwrap();
        storage.save(&[]).unwrap();

        assert!(storage.load().unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(err.is_malformed());
        match err {
            StorageError::CorruptSnapshot { backup_path, .. } => {
                assert!(backup_path.exists());
                assert_eq!(fs::read_to_string(backup_path).unwrap(), "{ not json");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!storage.exists());
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        storage.save(&[]).unwrap();
        assert!(storage.exists());

        storage.delete().unwrap();
        assert!(!storage.exists());
        // Deleting twice is fine
        storage.delete().unwrap();
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
        assert!(!nested_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_backup_path() {
        let path = PathBuf::from("/data/writeai_projects.json");
        assert_eq!(
            corrupt_backup_path(&path),
            PathBuf::from("/data/writeai_projects.json.corrupt.backup")
        );
    }
}
