//! Write command handler
//!
//! Streams lines from stdin into a project. Edits go through the auto-save
//! task, so the snapshot is only written once typing pauses and again at the
//! end of input.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use writeai_core::autosave::{spawn_autosave_task, SaveStatus};
use writeai_core::{ProjectPatch, ProjectStorage, ProjectStore, WritingStats};

use super::resolve_id;
use crate::output::{Output, OutputFormat};

/// Append stdin to a project (or replace its content) with auto-save
pub async fn run<S>(
    store: ProjectStore<S>,
    id: String,
    replace: bool,
    delay: Duration,
    word_goal: usize,
    output: &Output,
) -> Result<()>
where
    S: ProjectStorage + Send + 'static,
{
    if output.should_prompt() && crate::editor::stdin_is_tty() {
        eprintln!("Writing... press Ctrl-D to finish.");
    }
    let input = BufReader::new(tokio::io::stdin());
    let session = Session {
        replace,
        delay,
        word_goal,
    };
    run_with_input(store, id, session, input, output).await
}

/// Settings for one writing session
#[derive(Debug, Clone, Copy)]
pub struct Session {
    /// Start from empty content instead of appending
    pub replace: bool,
    /// Auto-save quiet interval
    pub delay: Duration,
    pub word_goal: usize,
}

pub async fn run_with_input<S, R>(
    store: ProjectStore<S>,
    id: String,
    session: Session,
    input: R,
    output: &Output,
) -> Result<()>
where
    S: ProjectStorage + Send + 'static,
    R: AsyncBufRead + Unpin,
{
    let id = resolve_id(&id, &store)?;
    let mut content = if session.replace {
        String::new()
    } else {
        store
            .get(&id)
            .ok_or_else(|| anyhow!("Project not found: {}", id))?
            .content()
            .to_string()
    };

    let store = store.into_shared();
    let autosave = spawn_autosave_task(store.clone(), session.delay);
    let mut last_status = autosave.status();

    if session.replace {
        autosave
            .edit(id.clone(), ProjectPatch::new().content(content.clone()))
            .await?;
    }

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&line);
        content.push('\n');

        autosave
            .edit(id.clone(), ProjectPatch::new().content(content.clone()))
            .await?;

        let status = autosave.status();
        if status != last_status {
            report(&status, output);
            last_status = status;
        }
    }

    autosave.shutdown().await?;

    let store = store.lock().await;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project was deleted while writing: {}", id))?;
    let stats = WritingStats::analyze_with_goal(project.content(), session.word_goal);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "id": project.id(),
                    "words": stats.words,
                    "goal": stats.goal,
                    "updated_at": project.updated_at()
                })
            );
        }
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            output.success(&format!(
                "Saved {} ({} words, {} min read)",
                project.title(),
                stats.words,
                stats.reading_time_minutes
            ));
            println!(
                "Session goal: {}/{} words ({}%). {}",
                stats.goal.words,
                stats.goal.target,
                stats.goal.percent,
                stats.goal.message()
            );
        }
    }

    Ok(())
}

fn report(status: &SaveStatus, output: &Output) {
    if !output.should_prompt() {
        return;
    }
    match status {
        SaveStatus::Saved(at) => eprintln!("(saved {})", at.format("%H:%M:%S")),
        SaveStatus::Failed(reason) => eprintln!("⚠ Auto-save failed: {}", reason),
        SaveStatus::Idle | SaveStatus::Pending => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use writeai_core::MemoryStorage;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn session(replace: bool) -> Session {
        Session {
            replace,
            delay: Duration::from_secs(2),
            word_goal: 500,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_appends_lines_and_saves_once() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), false).unwrap();
        let id = store.create("Journal", "Day one.").unwrap().id().clone();

        let input: &[u8] = b"It rained.\nThen it stopped.\n";
        run_with_input(
            store,
            id.to_string(),
            session(false),
            input,
            &quiet(),
        )
        .await
        .unwrap();

        let reopened = ProjectStore::with_storage(storage.clone(), false).unwrap();
        let project = reopened.get(&id).unwrap();
        assert_eq!(project.content(), "Day one.\nIt rained.\nThen it stopped.\n");
        assert_eq!(project.word_count(), 7);
        // create + one flush at the end of input
        assert_eq!(storage.write_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_starts_from_empty() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), false).unwrap();
        let id = store.create("Notes", "old text").unwrap().id().clone();

        let input: &[u8] = b"fresh start\n";
        run_with_input(
            store,
            id.to_string(),
            session(true),
            input,
            &quiet(),
        )
        .await
        .unwrap();

        let reopened = ProjectStore::with_storage(storage, false).unwrap();
        assert_eq!(reopened.get(&id).unwrap().content(), "fresh start\n");
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let store = ProjectStore::with_storage(MemoryStorage::new(), false).unwrap();
        let input: &[u8] = b"";
        let result = run_with_input(
            store,
            "ffffffff".to_string(),
            session(false),
            input,
            &quiet(),
        )
        .await;
        assert!(result.is_err());
    }
}
