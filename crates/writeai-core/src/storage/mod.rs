//! Storage layer
//!
//! The project collection is persisted as a single snapshot: read once when
//! the store opens, overwritten in full after every mutation. There is no
//! incremental diff and no transaction log.
//!
//! - `JsonFileStorage`: JSON array in the data directory
//! - `MemoryStorage`: shared in-memory slot

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use persistence::JsonFileStorage;

use crate::models::Project;

/// A durable slot holding the whole project collection
pub trait ProjectStorage {
    /// Read the snapshot
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. Unparseable data
    /// is reported with an error for which `is_malformed()` is true.
    fn load(&self) -> StorageResult<Option<Vec<Project>>>;

    /// Replace the snapshot with `projects`
    fn save(&self, projects: &[Project]) -> StorageResult<()>;
}
