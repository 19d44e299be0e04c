//! WriteAI CLI
//!
//! Command-line interface for WriteAI - writing projects, statistics and
//! drafting aids.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use writeai_core::{Config, ProjectStore, StorageError};

mod commands;
mod editor;
mod output;

use commands::assist::AssistArgs;
use commands::project::CreateArgs;
use commands::story::StoryArgs;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "writeai")]
#[command(about = "WriteAI - Local-first writing projects and drafting aids")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Show writing statistics for a project
    Stats {
        /// Project ID (full UUID or prefix)
        id: String,
    },
    /// Check a project for common writing issues
    Check {
        /// Project ID (full UUID or prefix)
        id: String,
    },
    /// Export a project to a file
    Export {
        /// Project ID (full UUID or prefix)
        id: String,
        /// Format: pdf, docx, html or txt
        #[arg(short, long, default_value = "txt")]
        format: String,
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate a story idea
    Story {
        #[arg(short, long)]
        genre: Option<String>,
        #[arg(short, long)]
        setting: Option<String>,
        #[arg(short = 'p', long)]
        character: Option<String>,
        #[arg(short, long)]
        conflict: Option<String>,
        /// Pick anything not given at random
        #[arg(short, long)]
        random: bool,
        /// Save the idea as a new story project
        #[arg(long)]
        create: bool,
        /// Seed for repeatable ideas
        #[arg(long)]
        seed: Option<u64>,
        /// List the available choices
        #[arg(long)]
        options: bool,
    },
    /// Ask the writing assistant
    Assist {
        /// Your question
        message: Option<String>,
        /// Use a quick action (1-4)
        #[arg(long, conflicts_with = "message")]
        quick: Option<usize>,
        /// Project whose draft to discuss
        #[arg(long)]
        project: Option<String>,
        /// Seed for repeatable replies
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write into a project from stdin with auto-save
    Write {
        /// Project ID (full UUID or prefix)
        id: String,
        /// Replace the content instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// List all tags
    Tags,
    /// Show the dashboard summary
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a new project
    #[command(alias = "add")]
    Create {
        /// Project title
        title: String,
        /// Initial content
        #[arg(short, long)]
        content: Option<String>,
        /// Type: story, article, script or other
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Tags to add
        #[arg(long)]
        tag: Vec<String>,
        /// Make the project public
        #[arg(long)]
        public: bool,
        /// Write the content in $EDITOR
        #[arg(short, long, conflicts_with = "content")]
        edit: bool,
    },
    /// List projects
    #[command(alias = "ls")]
    List {
        /// Filter by tag
        #[arg(long)]
        tag: Option<String>,
        /// Filter by type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Search titles and content
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show project details
    Show {
        /// Project ID (full UUID or prefix)
        id: String,
    },
    /// Edit a project (opens $EDITOR when no field is given)
    Edit {
        /// Project ID (full UUID or prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project ID (full UUID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Add or remove tags
    Tag {
        /// Project ID (full UUID or prefix)
        id: String,
        #[arg(short, long)]
        add: Vec<String>,
        #[arg(short, long)]
        remove: Vec<String>,
    },
    /// Make a project public (or private with --private)
    Publish {
        /// Project ID (full UUID or prefix)
        id: String,
        #[arg(long)]
        private: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, autosave_delay_ms, assistant_delay_ms,
        /// word_goal, seed_examples, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = storage_hint(&e) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Commands::Config { command } = &cli.command {
        init_logging(cli.verbose, None);
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(cli.verbose, config.log_file.as_ref());
    debug!(data_dir = ?config.data_dir, "configuration loaded");

    let mut store = ProjectStore::open(&config)?;
    if let Some(discarded) = store.discarded_snapshot() {
        eprintln!("Warning: {}", discarded);
        if let Some(hint) = discarded.recovery_suggestion() {
            eprintln!("Hint: {}", hint);
        }
    }

    match cli.command {
        Commands::Project { command } => handle_project_command(command, &mut store, &output),
        Commands::Stats { id } => commands::stats::show(&store, id, config.word_goal, &output),
        Commands::Check { id } => commands::check::run(&store, id, &output),
        Commands::Export { id, format, out } => {
            commands::export::run(&store, id, format, out, &output)
        }
        Commands::Story {
            genre,
            setting,
            character,
            conflict,
            random,
            create,
            seed,
            options,
        } => commands::story::run(
            &mut store,
            StoryArgs {
                genre,
                setting,
                character,
                conflict,
                random,
                create,
                seed,
                options,
            },
            &output,
        ),
        Commands::Assist {
            message,
            quick,
            project,
            seed,
        } => {
            commands::assist::run(
                &store,
                AssistArgs {
                    message,
                    quick,
                    project,
                    seed,
                },
                config.assistant_delay(),
                &output,
            )
            .await
        }
        Commands::Write { id, replace } => {
            commands::write::run(
                store,
                id,
                replace,
                config.autosave_delay(),
                config.word_goal,
                &output,
            )
            .await
        }
        Commands::Tags => commands::tags::list(&store, &output),
        Commands::Status => commands::status::show(&store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Recovery hint for the first storage error in the chain
fn storage_hint(error: &anyhow::Error) -> Option<String> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}

fn handle_project_command(
    command: ProjectCommands,
    store: &mut ProjectStore,
    output: &Output,
) -> Result<()> {
    match command {
        ProjectCommands::Create {
            title,
            content,
            kind,
            tag,
            public,
            edit,
        } => commands::project::create(
            store,
            CreateArgs {
                title,
                content,
                kind,
                tags: tag,
                public,
                edit,
            },
            output,
        ),
        ProjectCommands::List { tag, kind, search } => {
            commands::project::list(store, tag, kind, search, output)
        }
        ProjectCommands::Show { id } => commands::project::show(store, id, output),
        ProjectCommands::Edit {
            id,
            title,
            content,
            kind,
        } => commands::project::edit(store, id, title, content, kind, output),
        ProjectCommands::Delete { id, yes } => commands::project::delete(store, id, yes, output),
        ProjectCommands::Tag { id, add, remove } => {
            commands::project::tag(store, id, add, remove, output)
        }
        ProjectCommands::Publish { id, private } => {
            commands::project::publish(store, id, private, output)
        }
    }
}

/// Initialize logging
///
/// Logs go to stderr, or to `log_file` when one is configured. `RUST_LOG`
/// overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool, log_file: Option<&PathBuf>) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("writeai_core={},writeai_cli={}", level, level))
    });

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                None
            }
        }
    });

    // Ignore error if already initialized
    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
