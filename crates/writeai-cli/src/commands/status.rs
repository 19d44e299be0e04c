//! Status command handler

use anyhow::Result;

use writeai_core::{ProjectStorage, ProjectStore};

use crate::output::Output;

/// Number of recently updated projects on the dashboard
const RECENT_LIMIT: usize = 5;

/// Show the dashboard summary
pub fn show<S: ProjectStorage>(store: &ProjectStore<S>, output: &Output) -> Result<()> {
    let summary = store.summary();

    let mut recent: Vec<_> = store.list().iter().collect();
    recent.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    recent.truncate(RECENT_LIMIT);

    output.print_summary(&summary, &recent);
    Ok(())
}
