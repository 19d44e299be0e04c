//! Tag command handlers

use anyhow::Result;

use writeai_core::{ProjectStorage, ProjectStore};

use crate::output::Output;

/// List all tags with usage counts
pub fn list<S: ProjectStorage>(store: &ProjectStore<S>, output: &Output) -> Result<()> {
    let tags = store.tags_with_counts();
    output.print_tags(&tags);
    Ok(())
}
