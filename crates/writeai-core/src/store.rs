//! Project store
//!
//! `ProjectStore` owns the authoritative, ordered collection of projects
//! (newest created first) and mirrors it to a `ProjectStorage` slot after
//! every mutation. The slot is read only once, when the store opens.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = ProjectStore::open(&config)?;  // Loads or seeds
//!
//! let project = store.create("Untitled", "Hello world")?;
//! store.update(project.id(), ProjectPatch::new().content("Hello world again"))?;
//!
//! for project in store.list() { /* ... */ }
//! ```
//!
//! Missing identifiers are never errors: `get` returns `None`, `update` and
//! `delete` return `false` and leave the collection untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{Project, ProjectId, ProjectPatch, ProjectType};
use crate::seed;
use crate::storage::{JsonFileStorage, ProjectStorage, StorageError};

/// Store shared between the caller and background tasks such as auto-save
pub type SharedStore<S> = Arc<Mutex<ProjectStore<S>>>;

/// Authoritative project collection backed by a durable snapshot
pub struct ProjectStore<S: ProjectStorage = JsonFileStorage> {
    /// Projects, newest created first
    projects: Vec<Project>,
    /// Durable mirror
    storage: S,
    /// Why the snapshot found at open was thrown away, if it was
    discarded: Option<StorageError>,
}

impl ProjectStore<JsonFileStorage> {
    /// Open the file-backed store described by `config`
    pub fn open(config: &Config) -> Result<Self> {
        Self::with_storage(JsonFileStorage::from_config(config), config.seed_examples)
    }
}

impl<S: ProjectStorage> ProjectStore<S> {
    /// Open a store over any storage slot
    ///
    /// - Snapshot present: loaded as-is (derived fields recomputed)
    /// - Snapshot absent or malformed: seeded with the example projects when
    ///   `seed_examples` is set, otherwise empty; persisted immediately
    pub fn with_storage(storage: S, seed_examples: bool) -> Result<Self> {
        let (loaded, discarded) = match storage.load() {
            Ok(loaded) => (loaded, None),
            Err(e) if e.is_malformed() => {
                warn!(error = %e, "discarding malformed project snapshot");
                (None, Some(e))
            }
            Err(e) => return Err(e).context("Failed to load projects"),
        };

        let mut store = Self {
            projects: Vec::new(),
            storage,
            discarded,
        };

        match loaded {
            Some(mut projects) => {
                for project in &mut projects {
                    project.normalize();
                }
                dedupe_ids(&mut projects);
                info!(count = projects.len(), "loaded projects");
                store.projects = projects;
            }
            None if seed_examples => {
                store.projects = seed::example_projects();
                info!(count = store.projects.len(), "seeded example projects");
                store.persist()?;
            }
            None => {
                debug!("starting with an empty project list");
            }
        }

        Ok(store)
    }

    /// Wrap the store for sharing with background tasks
    pub fn into_shared(self) -> SharedStore<S> {
        Arc::new(Mutex::new(self))
    }

    /// Access the underlying storage slot
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The error that made `open` throw away an unreadable snapshot
    pub fn discarded_snapshot(&self) -> Option<&StorageError> {
        self.discarded.as_ref()
    }

    // ==================== Core Operations ====================

    /// All projects, newest created first
    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    /// Create a project of type `other`
    pub fn create(&mut self, title: impl Into<String>, content: impl Into<String>) -> Result<Project> {
        self.create_with_type(title, content, ProjectType::default())
    }

    /// Create a project and put it at the front of the list
    pub fn create_with_type(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        kind: ProjectType,
    ) -> Result<Project> {
        self.create_with(title, content, kind, ProjectPatch::new())
    }

    /// Create a project with extra fields (tags, visibility) already set
    ///
    /// The project is written once, so `updated_at` equals `created_at`.
    pub fn create_with(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        kind: ProjectType,
        extra: ProjectPatch,
    ) -> Result<Project> {
        let project = Project::new(title, content, kind).initialized(extra);
        debug!(id = %project.id(), kind = %project.kind(), "creating project");
        self.projects.insert(0, project.clone());
        self.persist()?;
        Ok(project)
    }

    /// Apply a partial update
    ///
    /// Returns `false` without touching anything if `id` is unknown.
    pub fn update(&mut self, id: &str, patch: ProjectPatch) -> Result<bool> {
        let Some(project) = self.projects.iter_mut().find(|p| p.id() == id) else {
            debug!(%id, "update skipped, project not found");
            return Ok(false);
        };

        project.apply(patch);
        debug!(%id, words = project.word_count(), "updated project");
        self.persist()?;
        Ok(true)
    }

    /// Remove a project
    ///
    /// Returns `false` without touching anything if `id` is unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id() != id);
        if self.projects.len() == before {
            debug!(%id, "delete skipped, project not found");
            return Ok(false);
        }

        debug!(%id, "deleted project");
        self.persist()?;
        Ok(true)
    }

    /// Get a project by ID
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id() == id)
    }

    /// Projects whose ID is `prefix` or starts with it
    ///
    /// An exact match wins over longer IDs sharing the prefix. A blank
    /// prefix matches nothing.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Project> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Vec::new();
        }
        if let Some(project) = self.get(prefix) {
            return vec![project];
        }
        let prefix = prefix.to_ascii_lowercase();
        self.projects
            .iter()
            .filter(|p| p.id().to_ascii_lowercase().starts_with(&prefix))
            .collect()
    }

    // ==================== Queries ====================

    /// Projects carrying `tag`
    pub fn projects_by_tag(&self, tag: &str) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.has_tag(tag)).collect()
    }

    /// Projects of one type
    pub fn projects_by_type(&self, kind: ProjectType) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.kind() == kind).collect()
    }

    /// Case-insensitive search over title and content
    pub fn search(&self, query: &str) -> Vec<&Project> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.projects
            .iter()
            .filter(|p| {
                p.title().to_lowercase().contains(&needle)
                    || p.content().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Every tag with the number of projects using it, sorted by name
    pub fn tags_with_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for tag in self.projects.iter().flat_map(|p| p.tags()) {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect()
    }

    /// Dashboard figures
    pub fn summary(&self) -> StoreSummary {
        let mut by_type: BTreeMap<ProjectType, usize> =
            ProjectType::ALL.iter().map(|kind| (*kind, 0)).collect();
        for project in &self.projects {
            *by_type.entry(project.kind()).or_default() += 1;
        }

        StoreSummary {
            projects: self.projects.len(),
            total_words: self.projects.iter().map(Project::word_count).sum(),
            public_projects: self.projects.iter().filter(|p| p.is_public()).count(),
            by_type,
            last_updated: self
                .projects
                .iter()
                .max_by_key(|p| p.updated_at())
                .map(|p| p.id().clone()),
        }
    }

    // ==================== Persistence ====================

    /// Write the full collection to storage
    ///
    /// The in-memory collection is authoritative; if the write fails the
    /// change stays applied and the error is returned.
    pub fn persist(&self) -> Result<()> {
        self.storage
            .save(&self.projects)
            .context("Failed to save projects")
    }
}

/// Aggregate figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub projects: usize,
    pub total_words: usize,
    pub public_projects: usize,
    pub by_type: BTreeMap<ProjectType, usize>,
    pub last_updated: Option<ProjectId>,
}

/// Keep the first occurrence of each identifier
fn dedupe_ids(projects: &mut Vec<Project>) {
    let mut seen = std::collections::HashSet::new();
    let before = projects.len();
    projects.retain(|p| seen.insert(p.id().clone()));
    if projects.len() != before {
        warn!(dropped = before - projects.len(), "dropped projects with duplicate ids");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn empty_store() -> ProjectStore<MemoryStorage> {
        ProjectStore::with_storage(MemoryStorage::new(), false).unwrap()
    }

    #[test]
    fn test_open_seeds_examples() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let store = ProjectStore::open(&config).unwrap();

        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[0].id(), seed::MYSTERIOUS_LIBRARY_ID);
        assert!(config.projects_path().exists());
    }

    #[test]
    fn test_open_without_seeding() {
        let storage = MemoryStorage::new();
        let store = ProjectStore::with_storage(storage.clone(), false).unwrap();
        assert!(store.list().is_empty());
        assert_eq!(storage.write_count(), 0);
        assert!(store.discarded_snapshot().is_none());
    }

    #[test]
    fn test_malformed_snapshot_reseeds() {
        let storage = MemoryStorage::with_raw("definitely not json");
        let store = ProjectStore::with_storage(storage.clone(), true).unwrap();

        assert_eq!(store.list().len(), 2);
        let reloaded = storage.load().unwrap().unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(store.discarded_snapshot().unwrap().is_malformed());
    }

    #[test]
    fn test_malformed_file_reseeds() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(config.projects_path(), "[{\"title\": 5}]").unwrap();

        let store = ProjectStore::open(&config).unwrap();
        assert_eq!(store.list().len(), 2);
        assert!(temp_dir
            .path()
            .join("writeai_projects.json.corrupt.backup")
            .exists());

        let hint = store
            .discarded_snapshot()
            .and_then(StorageError::recovery_suggestion)
            .unwrap();
        assert!(hint.contains("corrupt.backup"));
    }

    #[test]
    fn test_create_example_scenario() {
        let mut store = empty_store();

        let project = store.create("Untitled", "Hello world").unwrap();
        assert_eq!(project.word_count(), 2);
        assert_eq!(project.kind(), ProjectType::Other);

        let fetched = store.get(project.id()).unwrap();
        assert_eq!(fetched.created_at(), fetched.updated_at());
        let created_updated_at = fetched.updated_at();

        std::thread::sleep(Duration::from_millis(5));
        let found = store
            .update(project.id(), ProjectPatch::new().content("Hello world again"))
            .unwrap();
        assert!(found);
        let updated = store.get(project.id()).unwrap();
        assert_eq!(updated.word_count(), 3);
        assert!(updated.updated_at() > created_updated_at);

        assert!(store.delete(project.id()).unwrap());
        assert!(store.list().iter().all(|p| p.id() != project.id()));
        assert!(store.get(project.id()).is_none());
    }

    #[test]
    fn test_create_prepends() {
        let mut store = empty_store();
        let first = store.create("First", "").unwrap();
        let second = store.create_with_type("Second", "", ProjectType::Script).unwrap();

        let ids: Vec<&ProjectId> = store.list().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![second.id(), first.id()]);
        assert_eq!(store.list()[0].kind(), ProjectType::Script);
    }

    #[test]
    fn test_update_title_keeps_word_count() {
        let mut store = empty_store();
        let project = store.create("Draft", "one two three four").unwrap();

        store
            .update(project.id(), ProjectPatch::new().title("Renamed"))
            .unwrap();

        let updated = store.get(project.id()).unwrap();
        assert_eq!(updated.title(), "Renamed");
        assert_eq!(updated.word_count(), 4);
        assert!(updated.updated_at() >= project.updated_at());
    }

    #[test]
    fn test_update_missing_is_noop() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), false).unwrap();
        store.create("Only", "text").unwrap();
        let writes = storage.write_count();
        let before = store.list().to_vec();

        let found = store
            .update("missing", ProjectPatch::new().title("Ghost"))
            .unwrap();

        assert!(!found);
        assert_eq!(store.list(), before.as_slice());
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), true).unwrap();
        let before = store.list().to_vec();
        let writes = storage.write_count();

        assert!(!store.delete("missing").unwrap());
        assert_eq!(store.list(), before.as_slice());
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), false).unwrap();

        let project = store.create("A", "a b").unwrap();
        assert_eq!(storage.write_count(), 1);
        store
            .update(project.id(), ProjectPatch::new().public(true))
            .unwrap();
        assert_eq!(storage.write_count(), 2);
        store.delete(project.id()).unwrap();
        assert_eq!(storage.write_count(), 3);
        assert!(storage.load().unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let snapshot = {
            let mut store = ProjectStore::open(&config).unwrap();
            let project = store
                .create_with_type("Persistent", "Body content", ProjectType::Article)
                .unwrap();
            store
                .update(project.id(), ProjectPatch::new().tags(["keep", "me"]))
                .unwrap();
            store.list().to_vec()
        };

        let store = ProjectStore::open(&config).unwrap();
        assert_eq!(store.list(), snapshot.as_slice());
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let storage = MemoryStorage::new();
        {
            let mut store = ProjectStore::with_storage(storage.clone(), true).unwrap();
            for project in store.list().to_vec() {
                store.delete(project.id()).unwrap();
            }
        }

        let store = ProjectStore::with_storage(storage, true).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_dropped_on_load() {
        let project = Project::new("Twin", "", ProjectType::Other);
        let storage = MemoryStorage::new();
        storage.save(&[project.clone(), project.clone()]).unwrap();

        let store = ProjectStore::with_storage(storage, false).unwrap();
        assert_eq!(store.list(), &[project]);
    }

    #[test]
    fn test_find_by_prefix() {
        let mut store = empty_store();
        let project = store.create("Findable", "").unwrap();
        let full = project.id().to_string();

        assert_eq!(store.find_by_prefix(&full).len(), 1);
        assert_eq!(store.find_by_prefix(&full[..13]).len(), 1);
        assert!(store.find_by_prefix("zzzz").is_empty());
        assert!(store.find_by_prefix("").is_empty());
        assert!(store.find_by_prefix("   ").is_empty());
    }

    #[test]
    fn test_find_by_prefix_prefers_exact_match() {
        let storage = MemoryStorage::new();
        storage
            .save(&[
                Project::with_id("1", "One", "", ProjectType::Other),
                Project::with_id("17", "Seventeen", "", ProjectType::Other),
            ])
            .unwrap();
        let store = ProjectStore::with_storage(storage, false).unwrap();

        let exact = store.find_by_prefix("1");
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].title(), "One");
        assert_eq!(store.find_by_prefix("17")[0].title(), "Seventeen");
    }

    #[test]
    fn test_open_keeps_web_client_snapshot() {
        let raw = r#"[{
            "id": "1700000000000",
            "title": "My Novel",
            "content": "Chapter one begins here.",
            "type": "story",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T08:15:00.000Z",
            "wordCount": 4,
            "isPublic": false,
            "tags": ["novel"]
        }]"#;
        let storage = MemoryStorage::with_raw(raw);
        let mut store = ProjectStore::with_storage(storage.clone(), true).unwrap();

        let titles: Vec<&str> = store.list().iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["My Novel"]);
        assert_eq!(storage.write_count(), 0);

        assert!(store
            .update("1700000000000", ProjectPatch::new().content("Chapter two."))
            .unwrap());
        let reloaded = storage.load().unwrap().unwrap();
        assert_eq!(reloaded[0].id(), "1700000000000");
        assert_eq!(reloaded[0].word_count(), 2);
    }

    #[test]
    fn test_create_with_extra_fields_writes_once() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), false).unwrap();

        let project = store
            .create_with(
                "Tagged",
                "body",
                ProjectType::Article,
                ProjectPatch::new().tags(["news"]).public(true),
            )
            .unwrap();

        assert_eq!(storage.write_count(), 1);
        assert!(project.is_public());
        assert!(project.has_tag("news"));
        assert_eq!(project.created_at(), project.updated_at());
        assert_eq!(store.get(project.id()), Some(&project));
    }

    #[test]
    fn test_queries() {
        let mut store = ProjectStore::with_storage(MemoryStorage::new(), true).unwrap();
        let script = store
            .create_with_type("Courtroom Scene", "The judge enters.", ProjectType::Script)
            .unwrap();
        store
            .update(script.id(), ProjectPatch::new().tags(["drama", "writing"]))
            .unwrap();

        assert_eq!(store.projects_by_type(ProjectType::Script).len(), 1);
        assert_eq!(store.projects_by_tag("writing").len(), 2);
        assert_eq!(store.search("JUDGE").len(), 1);
        assert_eq!(store.search("library").len(), 1);
        assert!(store.search("   ").is_empty());

        let tags = store.tags_with_counts();
        let names: Vec<&str> = tags.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["drama", "fantasy", "mystery", "technology", "writing"]
        );
        let writing = tags.iter().find(|(name, _)| name == "writing").unwrap();
        assert_eq!(writing.1, 2);
    }

    #[test]
    fn test_summary() {
        let mut store = ProjectStore::with_storage(MemoryStorage::new(), true).unwrap();
        let latest = store.create("Newest", "four words right here").unwrap();

        let summary = store.summary();
        assert_eq!(summary.projects, 3);
        assert_eq!(summary.public_projects, 1);
        assert_eq!(summary.by_type[&ProjectType::Story], 1);
        assert_eq!(summary.by_type[&ProjectType::Article], 1);
        assert_eq!(summary.by_type[&ProjectType::Other], 1);
        assert_eq!(summary.by_type[&ProjectType::Script], 0);
        assert_eq!(
            summary.total_words,
            store.list().iter().map(|p| p.word_count()).sum::<usize>()
        );
        assert_eq!(summary.last_updated.as_ref(), Some(latest.id()));
    }

    #[test]
    fn test_summary_empty() {
        let summary = empty_store().summary();
        assert_eq!(summary.projects, 0);
        assert_eq!(summary.total_words, 0);
        assert!(summary.last_updated.is_none());
    }
}
