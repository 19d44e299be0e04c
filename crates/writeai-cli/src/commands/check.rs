//! Check command handler

use anyhow::{anyhow, Result};

use writeai_core::grammar;
use writeai_core::{ProjectStorage, ProjectStore};

use super::resolve_id;
use crate::output::Output;

/// Run the writing hints over a project's content
pub fn run<S: ProjectStorage>(store: &ProjectStore<S>, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    let issues = grammar::check(project.content());
    output.print_issues(&issues);
    Ok(())
}
