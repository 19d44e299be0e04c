//! Story generator command handler

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use writeai_core::story::{StoryPrompt, CHARACTERS, CONFLICTS, GENRES, SETTINGS};
use writeai_core::{ProjectStorage, ProjectStore, ProjectType};

use crate::output::{print_json, short_id, Output, OutputFormat};

/// Options for `story`
#[derive(Debug, Default)]
pub struct StoryArgs {
    pub genre: Option<String>,
    pub setting: Option<String>,
    pub character: Option<String>,
    pub conflict: Option<String>,
    /// Fill unset fields at random
    pub random: bool,
    /// Save the idea as a new story project
    pub create: bool,
    /// Seed for repeatable output
    pub seed: Option<u64>,
    /// Print the available choices and exit
    pub options: bool,
}

/// Generate a story idea
pub fn run<S: ProjectStorage>(
    store: &mut ProjectStore<S>,
    args: StoryArgs,
    output: &Output,
) -> Result<()> {
    if args.options {
        print_options(output);
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut prompt = StoryPrompt::new();
    if let Some(genre) = args.genre.as_deref() {
        prompt = prompt.genre(genre)?;
    }
    if let Some(setting) = args.setting.as_deref() {
        prompt = prompt.setting(setting)?;
    }
    if let Some(character) = args.character.as_deref() {
        prompt = prompt.character(character)?;
    }
    if let Some(conflict) = args.conflict.as_deref() {
        prompt = prompt.conflict(conflict)?;
    }
    if args.random {
        prompt.fill_missing(&mut rng);
    }

    let idea = prompt.generate(&mut rng)?;

    let created = if args.create {
        Some(
            store
                .create_with_type(idea.title(), idea.draft(), ProjectType::Story)
                .context("Failed to create story project")?,
        )
    } else {
        None
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "idea": idea,
                    "title": idea.title(),
                    "project_id": created.as_ref().map(|p| p.id())
                })
            );
        }
        OutputFormat::Quiet => match &created {
            Some(project) => println!("{}", project.id()),
            None => println!("{}", idea.text),
        },
        OutputFormat::Human => {
            println!(
                "{} | {} | {} | {}",
                idea.genre, idea.setting, idea.character, idea.conflict
            );
            println!();
            println!("{}", idea.text);
            if let Some(project) = &created {
                println!();
                output.success(&format!(
                    "Created project {}: {}",
                    short_id(project.id()),
                    project.title()
                ));
            }
        }
    }

    Ok(())
}

fn print_options(output: &Output) {
    let groups = [
        ("genres", GENRES),
        ("settings", SETTINGS),
        ("characters", CHARACTERS),
        ("conflicts", CONFLICTS),
    ];

    match output.format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = groups
                .iter()
                .map(|(name, values)| (name.to_string(), serde_json::json!(values)))
                .collect();
            print_json(&map);
        }
        _ => {
            for (name, values) in groups {
                println!("{}: {}", name, values.join(", "));
            }
        }
    }
}
