//! Project command handlers

use std::collections::BTreeSet;

use anyhow::{anyhow, bail, Context, Result};

use writeai_core::{ProjectPatch, ProjectStorage, ProjectStore, ProjectType};

use super::resolve_id;
use crate::editor::{confirm, edit_draft, Draft};
use crate::output::{short_id, truncate_line, Output};

/// Options for `project create`
#[derive(Debug, Default)]
pub struct CreateArgs {
    pub title: String,
    pub content: Option<String>,
    pub kind: Option<String>,
    pub tags: Vec<String>,
    pub public: bool,
    pub edit: bool,
}

/// Create a new project
pub fn create<S: ProjectStorage>(
    store: &mut ProjectStore<S>,
    args: CreateArgs,
    output: &Output,
) -> Result<()> {
    let kind = parse_kind(args.kind.as_deref())?.unwrap_or_default();

    let (title, content) = match args.content {
        Some(content) => (args.title, content),
        None if args.edit => {
            let draft = edit_draft(&Draft::new(args.title, kind, ""))
                .context("Failed to edit content")?;
            (draft.title, draft.content)
        }
        None => (args.title, String::new()),
    };

    let mut extra = ProjectPatch::new();
    if !args.tags.is_empty() {
        extra = extra.tags(clean_tags(args.tags));
    }
    if args.public {
        extra = extra.public(true);
    }

    let project = store
        .create_with(title, content, kind, extra)
        .context("Failed to create project")?;

    output.print_project(&project);

    Ok(())
}

/// List projects, optionally filtered
pub fn list<S: ProjectStorage>(
    store: &ProjectStore<S>,
    tag: Option<String>,
    kind: Option<String>,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    let kind = parse_kind(kind.as_deref())?;

    let projects: Vec<_> = match &search {
        Some(query) => store.search(query),
        None => store.list().iter().collect(),
    }
    .into_iter()
    .filter(|p| tag.as_deref().map_or(true, |t| p.has_tag(t)))
    .filter(|p| kind.map_or(true, |k| p.kind() == k))
    .collect();

    output.print_projects(&projects);
    Ok(())
}

/// Show project details
pub fn show<S: ProjectStorage>(store: &ProjectStore<S>, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    output.print_project(project);
    Ok(())
}

/// Edit a project
///
/// With no field flags the project is opened in $EDITOR, where both the
/// title and the content can be changed.
pub fn edit<S: ProjectStorage>(
    store: &mut ProjectStore<S>,
    id: String,
    title: Option<String>,
    content: Option<String>,
    kind: Option<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    let mut patch = ProjectPatch::new();
    if let Some(title) = title {
        if title.trim().is_empty() {
            bail!("Title cannot be empty");
        }
        patch = patch.title(title);
    }
    if let Some(content) = content {
        patch = patch.content(content);
    }
    if let Some(kind) = parse_kind(kind.as_deref())? {
        patch = patch.kind(kind);
    }

    if patch.is_empty() {
        let draft = Draft::new(project.title(), project.kind(), project.content());
        let edited = edit_draft(&draft).context("Failed to edit content")?;
        patch = draft_changes(&draft, edited);
        if patch.is_empty() {
            output.message("No changes made.");
            return Ok(());
        }
    }

    store.update(&id, patch).context("Failed to update project")?;
    output.success(&format!("Updated project: {}", short_id(&id)));

    Ok(())
}

/// Delete a project
pub fn delete<S: ProjectStorage>(
    store: &mut ProjectStore<S>,
    id: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    if !yes && output.should_prompt() {
        println!("Delete project: {} - {}", short_id(&id), project.title());
        if !project.content().is_empty() {
            println!("  {}", truncate_line(project.content(), 60));
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(&id).context("Failed to delete project")?;
    output.success(&format!("Deleted project: {}", short_id(&id)));

    Ok(())
}

/// Add or remove tags
pub fn tag<S: ProjectStorage>(
    store: &mut ProjectStore<S>,
    id: String,
    add: Vec<String>,
    remove: Vec<String>,
    output: &Output,
) -> Result<()> {
    if add.is_empty() && remove.is_empty() {
        bail!("Nothing to do. Use --add or --remove.");
    }

    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    let mut tags = project.tags().clone();
    tags.extend(clean_tags(add));
    for tag in clean_tags(remove) {
        tags.remove(&tag);
    }

    store
        .update(&id, ProjectPatch::new().tags(tags.iter().cloned()))
        .context("Failed to update tags")?;

    let listed = if tags.is_empty() {
        "(none)".to_string()
    } else {
        tags.into_iter().collect::<Vec<_>>().join(", ")
    };
    output.success(&format!("Tags for {}: {}", short_id(&id), listed));

    Ok(())
}

/// Make a project public or private
pub fn publish<S: ProjectStorage>(
    store: &mut ProjectStore<S>,
    id: String,
    private: bool,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(&id, store)?;
    store
        .update(&id, ProjectPatch::new().public(!private))
        .context("Failed to update visibility")?;

    let state = if private { "private" } else { "public" };
    output.success(&format!("Project {} is now {}", short_id(&id), state));
    Ok(())
}

/// Patch holding only what the editor session changed
fn draft_changes(before: &Draft, after: Draft) -> ProjectPatch {
    let mut patch = ProjectPatch::new();
    if after.title != before.title {
        patch = patch.title(after.title);
    }
    if after.content != before.content {
        patch = patch.content(after.content);
    }
    patch
}

fn parse_kind(kind: Option<&str>) -> Result<Option<ProjectType>> {
    kind.map(|k| k.parse::<ProjectType>().map_err(|e| anyhow!(e)))
        .transpose()
}

/// Trim and drop empty tags
fn clean_tags(tags: Vec<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use writeai_core::MemoryStorage;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn empty_store() -> ProjectStore<MemoryStorage> {
        ProjectStore::with_storage(MemoryStorage::new(), false).unwrap()
    }

    #[test]
    fn test_create_with_options() {
        let mut store = empty_store();
        create(
            &mut store,
            CreateArgs {
                title: "Pilot".to_string(),
                content: Some("INT. KITCHEN - NIGHT".to_string()),
                kind: Some("script".to_string()),
                tags: vec![" drama ".to_string(), "".to_string()],
                public: true,
                edit: false,
            },
            &quiet(),
        )
        .unwrap();

        let project = &store.list()[0];
        assert_eq!(project.title(), "Pilot");
        assert_eq!(project.kind(), ProjectType::Script);
        assert_eq!(project.word_count(), 4);
        assert!(project.is_public());
        assert_eq!(project.tags().len(), 1);
        assert!(project.has_tag("drama"));
    }

    #[test]
    fn test_create_with_tags_writes_once() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::with_storage(storage.clone(), false).unwrap();
        create(
            &mut store,
            CreateArgs {
                title: "Launch".to_string(),
                tags: vec!["news".to_string()],
                public: true,
                ..Default::default()
            },
            &quiet(),
        )
        .unwrap();

        let project = &store.list()[0];
        assert!(project.has_tag("news"));
        assert!(project.is_public());
        assert_eq!(project.created_at(), project.updated_at());
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let mut store = empty_store();
        let args = CreateArgs {
            title: "Poem".to_string(),
            kind: Some("poem".to_string()),
            ..Default::default()
        };
        assert!(create(&mut store, args, &quiet()).is_err());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_edit_fields() {
        let mut store = empty_store();
        let id = store.create("Old", "text").unwrap().id().clone();

        edit(
            &mut store,
            id.to_string(),
            Some("New".to_string()),
            Some("two words".to_string()),
            Some("article".to_string()),
            &quiet(),
        )
        .unwrap();

        let project = store.get(&id).unwrap();
        assert_eq!(project.title(), "New");
        assert_eq!(project.word_count(), 2);
        assert_eq!(project.kind(), ProjectType::Article);
    }

    #[test]
    fn test_edit_rejects_blank_title() {
        let mut store = empty_store();
        let id = store.create("Keep", "").unwrap().id().clone();
        let result = edit(
            &mut store,
            id.to_string(),
            Some("  ".to_string()),
            None,
            None,
            &quiet(),
        );
        assert!(result.is_err());
        assert_eq!(store.get(&id).unwrap().title(), "Keep");
    }

    #[test]
    fn test_draft_changes_only_patches_edited_fields() {
        let before = Draft::new("Title", ProjectType::Story, "body");

        assert!(draft_changes(&before, before.clone()).is_empty());

        let retitled = draft_changes(&before, Draft::new("Renamed", ProjectType::Story, "body"));
        assert_eq!(retitled.title.as_deref(), Some("Renamed"));
        assert!(retitled.content.is_none());

        let rewritten = draft_changes(&before, Draft::new("Title", ProjectType::Story, "new"));
        assert!(rewritten.title.is_none());
        assert_eq!(rewritten.content.as_deref(), Some("new"));
    }

    #[test]
    fn test_tag_add_and_remove() {
        let mut store = empty_store();
        let id = store.create("Tagged", "").unwrap().id().clone();

        tag(
            &mut store,
            id.to_string(),
            vec!["a".to_string(), "b".to_string()],
            vec![],
            &quiet(),
        )
        .unwrap();
        tag(
            &mut store,
            id.to_string(),
            vec!["c".to_string()],
            vec!["a".to_string()],
            &quiet(),
        )
        .unwrap();

        let tags: Vec<_> = store.get(&id).unwrap().tags().iter().cloned().collect();
        assert_eq!(tags, vec!["b", "c"]);
    }

    #[test]
    fn test_tag_requires_an_action() {
        let mut store = empty_store();
        let id = store.create("Tagged", "").unwrap().id().clone();
        assert!(tag(&mut store, id.to_string(), vec![], vec![], &quiet()).is_err());
    }

    #[test]
    fn test_publish_toggle() {
        let mut store = empty_store();
        let id = store.create("Essay", "").unwrap().id().clone();

        publish(&mut store, id.to_string(), false, &quiet()).unwrap();
        assert!(store.get(&id).unwrap().is_public());

        publish(&mut store, id.to_string(), true, &quiet()).unwrap();
        assert!(!store.get(&id).unwrap().is_public());
    }

    #[test]
    fn test_delete_with_yes() {
        let mut store = empty_store();
        let id = store.create("Doomed", "").unwrap().id().clone();

        delete(&mut store, id.to_string(), true, &quiet()).unwrap();
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_list_filters() {
        let mut store = ProjectStore::with_storage(MemoryStorage::new(), true).unwrap();
        store.create("Loose notes", "").unwrap();

        assert!(list(&store, Some("mystery".into()), None, None, &quiet()).is_ok());
        assert!(list(&store, None, Some("story".into()), None, &quiet()).is_ok());
        assert!(list(&store, None, Some("novel".into()), None, &quiet()).is_err());
        assert!(list(&store, None, None, Some("library".into()), &quiet()).is_ok());
    }
}
