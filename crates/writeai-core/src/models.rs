//! Data models for WriteAI
//!
//! Defines the persisted `Project` record, its `ProjectId` and `ProjectType`,
//! and the `ProjectPatch` used for partial updates.
//!
//! Field names serialize in camelCase and identifiers are plain strings, so a
//! snapshot reads the same as the records the web client kept in local
//! storage (ids such as `"1"` or `"1700000000000"` included).

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics;

/// Kind of writing a project holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Story,
    Article,
    Script,
    #[default]
    Other,
}

impl ProjectType {
    /// All project types, in display order
    pub const ALL: [ProjectType; 4] = [
        ProjectType::Story,
        ProjectType::Article,
        ProjectType::Script,
        ProjectType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Story => "story",
            ProjectType::Article => "article",
            ProjectType::Script => "script",
            ProjectType::Other => "other",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "story" => Ok(ProjectType::Story),
            "article" => Ok(ProjectType::Article),
            "script" => Ok(ProjectType::Script),
            "other" => Ok(ProjectType::Other),
            other => Err(format!(
                "unknown project type '{}' (expected story, article, script or other)",
                other
            )),
        }
    }
}

/// Opaque project identifier
///
/// New projects get a UUID v7 string, but any non-empty string read back
/// from a snapshot is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// A fresh, time-ordered identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for ProjectId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ProjectId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProjectId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A writing project
///
/// `word_count` is derived from `content` and is only ever changed through
/// the content setters, so the two cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    title: String,
    content: String,
    #[serde(rename = "type", default)]
    kind: ProjectType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    word_count: usize,
    #[serde(default)]
    is_public: bool,
    #[serde(default)]
    tags: BTreeSet<String>,
}

impl Project {
    /// Create a new project with a fresh identifier
    pub fn new(title: impl Into<String>, content: impl Into<String>, kind: ProjectType) -> Self {
        Self::with_id(ProjectId::generate(), title, content, kind)
    }

    /// Create a project with a specific ID (for fixtures and seed data)
    pub fn with_id(
        id: impl Into<ProjectId>,
        title: impl Into<String>,
        content: impl Into<String>,
        kind: ProjectType,
    ) -> Self {
        let content = content.into();
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            word_count: metrics::word_count(&content),
            content,
            kind,
            created_at: now,
            updated_at: now,
            is_public: false,
            tags: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ProjectType {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Replace the content and recompute the word count
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.word_count = metrics::word_count(&self.content);
        self.touch();
    }

    pub fn set_kind(&mut self, kind: ProjectType) {
        self.kind = kind;
        self.touch();
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
        self.touch();
    }

    /// Add a tag
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        if self.tags.insert(tag.into()) {
            self.touch();
        }
    }

    /// Remove a tag
    pub fn remove_tag(&mut self, tag: &str) {
        if self.tags.remove(tag) {
            self.touch();
        }
    }

    /// Set all tags (replacing existing)
    pub fn set_tags<I, T>(&mut self, tags: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self.touch();
    }

    /// Apply a partial update
    ///
    /// `updated_at` is refreshed even when the patch is empty.
    pub fn apply(&mut self, patch: ProjectPatch) {
        self.assign(patch);
        self.touch();
    }

    /// Fill in fields on a project that has not been stored yet, leaving
    /// `updated_at == created_at`
    pub(crate) fn initialized(mut self, patch: ProjectPatch) -> Self {
        self.assign(patch);
        self
    }

    fn assign(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.word_count = metrics::word_count(&content);
            self.content = content;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }

    /// Backdate the timestamps (seed data only)
    pub(crate) fn with_timestamps(
        mut self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at.max(created_at);
        self
    }

    /// Restore derived fields on a record read back from storage
    pub(crate) fn normalize(&mut self) {
        self.word_count = metrics::word_count(&self.content);
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Partial update for a project
///
/// Only user-editable fields appear here; identity, timestamps and the word
/// count are maintained by the project itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn kind(mut self, kind: ProjectType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// True if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.kind.is_none()
            && self.is_public.is_none()
            && self.tags.is_none()
    }

    /// Combine with a newer patch; fields set in `newer` win
    pub fn merge(self, newer: ProjectPatch) -> ProjectPatch {
        ProjectPatch {
            title: newer.title.or(self.title),
            content: newer.content.or(self.content),
            kind: newer.kind.or(self.kind),
            is_public: newer.is_public.or(self.is_public),
            tags: newer.tags.or(self.tags),
        }
    }
}
