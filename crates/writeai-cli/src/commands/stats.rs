//! Stats command handler

use anyhow::{anyhow, Result};

use writeai_core::{ProjectStorage, ProjectStore, WritingStats};

use super::resolve_id;
use crate::output::Output;

/// Show writing statistics for a project
pub fn show<S: ProjectStorage>(
    store: &ProjectStore<S>,
    id: String,
    word_goal: usize,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    let stats = WritingStats::analyze_with_goal(project.content(), word_goal);
    output.print_stats(project, &stats);
    Ok(())
}
