//! Assistant command handler

use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use writeai_core::assistant::{Assistant, CannedResponses, Role, QUICK_ACTIONS};
use writeai_core::{ProjectStorage, ProjectStore};

use super::resolve_id;
use crate::output::{print_json, Output, OutputFormat};

/// Options for `assist`
#[derive(Debug, Default)]
pub struct AssistArgs {
    /// Free-form question
    pub message: Option<String>,
    /// Quick action number (1-based)
    pub quick: Option<usize>,
    /// Project whose draft is given as context
    pub project: Option<String>,
    /// Seed for repeatable replies
    pub seed: Option<u64>,
}

/// Ask the writing assistant for help
pub async fn run<S: ProjectStorage>(
    store: &ProjectStore<S>,
    args: AssistArgs,
    delay: Duration,
    output: &Output,
) -> Result<()> {
    let provider = match args.seed {
        Some(seed) => CannedResponses::with_seed(seed),
        None => CannedResponses::new(),
    };
    let mut assistant = Assistant::with_provider(provider, delay);

    let message = match (args.message, args.quick) {
        (Some(_), Some(_)) => bail!("Give either a message or --quick, not both"),
        (Some(message), None) => message,
        (None, Some(n)) => quick_action(n)?.to_string(),
        (None, None) => {
            print_menu(&assistant, output);
            return Ok(());
        }
    };

    let draft = match args.project {
        Some(id) => {
            let id = resolve_id(&id, store)?;
            store
                .get(&id)
                .ok_or_else(|| anyhow!("Project not found: {}", id))?
                .content()
                .to_string()
        }
        None => String::new(),
    };

    if output.should_prompt() {
        eprintln!("Thinking...");
    }

    let Some(reply) = assistant.send(&message, &draft).await else {
        bail!("Message cannot be empty");
    };

    match output.format {
        OutputFormat::Json => print_json(assistant.messages()),
        OutputFormat::Quiet => println!("{}", reply),
        OutputFormat::Human => {
            for message in assistant.messages() {
                let who = match message.role {
                    Role::User => "You",
                    Role::Assistant => "Assistant",
                };
                println!("{}: {}", who, message.content);
                println!();
            }
        }
    }

    Ok(())
}

fn quick_action(n: usize) -> Result<&'static str> {
    n.checked_sub(1)
        .and_then(|i| QUICK_ACTIONS.get(i))
        .copied()
        .ok_or_else(|| anyhow!("Quick action must be between 1 and {}", QUICK_ACTIONS.len()))
}

fn print_menu(assistant: &Assistant, output: &Output) {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "greeting": assistant.messages()[0].content,
                    "quick_actions": assistant.quick_actions()
                })
            );
        }
        OutputFormat::Quiet => {
            for action in assistant.quick_actions() {
                println!("{}", action);
            }
        }
        OutputFormat::Human => {
            println!("{}", assistant.messages()[0].content);
            println!();
            println!("Quick actions (use --quick N):");
            for (i, action) in assistant.quick_actions().iter().enumerate() {
                println!("  {}. {}", i + 1, action);
            }
        }
    }
}
