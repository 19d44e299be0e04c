//! Storage errors
//!
//! Every variant names the file involved. `recovery_suggestion` turns the
//! ones a user can act on into a one-line hint for the CLI.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing the project snapshot
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot access '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Disk full while saving projects to '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read project snapshot '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write project snapshot '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file was written but could not replace the snapshot
    #[error("Could not replace '{path}' with '{temp}': {source}")]
    Replace {
        temp: PathBuf,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unparseable snapshot, moved aside to `backup_path`
    #[error("Project snapshot '{path}' is corrupted ({details}); moved to '{backup_path}'")]
    CorruptSnapshot {
        path: PathBuf,
        backup_path: PathBuf,
        details: String,
    },

    /// Unparseable snapshot that could not be moved aside
    #[error("Invalid project snapshot in '{path}': {details}")]
    InvalidFormat { path: PathBuf, details: String },

    #[error("Failed to serialize projects: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Classify an I/O failure on `path`
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            // ErrorKind::StorageFull is recent, so also sniff the message
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::Write {
                path,
                source: error,
            },
        }
    }

    /// True if the stored data is unusable and should be treated as absent
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            StorageError::CorruptSnapshot { .. } | StorageError::InvalidFormat { .. }
        )
    }

    /// What the user can do about it, if anything
    pub fn recovery_suggestion(&self) -> Option<String> {
        let hint = match self {
            StorageError::DiskFull { .. } => {
                "Free up disk space; your last change is kept in memory until the next save.".to_string()
            }
            StorageError::PermissionDenied { path, .. } | StorageError::Read { path, .. } => {
                format!("Check that you can read and write '{}'.", path.display())
            }
            StorageError::CreateDirectory { .. } => {
                "Set data_dir to a writable directory (writeai config set data_dir <path>)."
                    .to_string()
            }
            StorageError::CorruptSnapshot { backup_path, .. } => format!(
                "Your old projects are in '{}'; fix the JSON there and copy it back to restore them.",
                backup_path.display()
            ),
            StorageError::InvalidFormat { path, .. } => format!(
                "Move '{}' out of the way to start over, or fix its JSON.",
                path.display()
            ),
            StorageError::Replace { temp, .. } => format!(
                "The new snapshot was left at '{}'; nothing was lost.",
                temp.display()
            ),
            StorageError::Write { .. } | StorageError::Serialize(_) | StorageError::Io(_) => {
                return None
            }
        };
        Some(hint)
    }
}

fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_gets_a_hint() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/data/writeai_projects.json"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(!err.is_malformed());
        let hint = err.recovery_suggestion().unwrap();
        assert!(hint.contains("/data/writeai_projects.json"));
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_other_io_errors_are_plain_write_failures() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = StorageError::from_io(io_err, PathBuf::from("/missing/dir/file.tmp"));

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_invalid_format_is_malformed() {
        let err = StorageError::InvalidFormat {
            path: PathBuf::from("memory"),
            details: "expected value".to_string(),
        };
        assert!(err.is_malformed());
        assert!(err.recovery_suggestion().unwrap().contains("memory"));
    }

    #[test]
    fn test_corrupt_snapshot_points_at_backup() {
        let err = StorageError::CorruptSnapshot {
            path: PathBuf::from("/data/writeai_projects.json"),
            backup_path: PathBuf::from("/data/writeai_projects.json.corrupt.backup"),
            details: "expected value at line 1 column 1".to_string(),
        };

        assert!(err.is_malformed());
        assert!(err.to_string().contains("corrupted"));
        assert!(err
            .recovery_suggestion()
            .unwrap()
            .contains("writeai_projects.json.corrupt.backup"));
    }
}
