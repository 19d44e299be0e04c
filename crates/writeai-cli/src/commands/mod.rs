//! Command handlers

pub mod assist;
pub mod check;
pub mod config;
pub mod export;
pub mod project;
pub mod stats;
pub mod status;
pub mod story;
pub mod tags;
pub mod write;

use anyhow::{bail, Result};

use writeai_core::{ProjectId, ProjectStorage, ProjectStore};

/// Resolve a project ID (full ID or unique prefix)
pub fn resolve_id<S: ProjectStorage>(id: &str, store: &ProjectStore<S>) -> Result<ProjectId> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Project ID cannot be empty");
    }

    let matches = store.find_by_prefix(id);

    match matches.len() {
        0 => bail!("No project found matching: {}", id),
        1 => Ok(matches[0].id().clone()),
        _ => {
            eprintln!("Multiple projects match '{}':", id);
            for project in &matches {
                eprintln!("  {} - {}", project.id(), project.title());
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
