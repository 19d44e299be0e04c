//! WriteAI Core Library
//!
//! This crate provides the core functionality for WriteAI, a local-first
//! writing workspace: a persisted collection of writing projects, text
//! metrics, and a handful of drafting aids.
//!
//! # Architecture
//!
//! - **ProjectStore**: owns the project list and writes the whole collection
//!   back to storage after every change
//! - **ProjectStorage**: a single JSON snapshot slot (file or in-memory)
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = ProjectStore::open(&config)?;
//!
//! let project = store.create("My Story", "Once upon a time")?;
//! store.update(project.id(), ProjectPatch::new().content("Once upon a time, again"))?;
//!
//! let stats = WritingStats::analyze(store.get(project.id()).unwrap().content());
//! ```
//!
//! # Modules
//!
//! - `store`: Project collection (main entry point)
//! - `models`: Project and partial-update types
//! - `metrics`: Word, sentence and readability statistics
//! - `storage`: Snapshot persistence
//! - `autosave`: Debounced background saving
//! - `assistant`, `grammar`, `story`, `export`: Drafting aids
//! - `config`: Application configuration

pub mod assistant;
pub mod autosave;
pub mod config;
pub mod export;
pub mod grammar;
pub mod metrics;
pub mod models;
pub mod seed;
pub mod storage;
pub mod store;
pub mod story;

pub use assistant::{Assistant, CannedResponses, ResponseProvider};
pub use autosave::{spawn_autosave_task, AutosaveHandle, SaveStatus};
pub use config::Config;
pub use export::{ExportFormat, ExportedFile};
pub use grammar::{GrammarIssue, IssueKind};
pub use metrics::{GoalProgress, WritingInsight, WritingStats};
pub use models::{Project, ProjectId, ProjectPatch, ProjectType};
pub use storage::{JsonFileStorage, MemoryStorage, ProjectStorage, StorageError};
pub use store::{ProjectStore, SharedStore, StoreSummary};
pub use story::{StoryError, StoryIdea, StoryPrompt};
