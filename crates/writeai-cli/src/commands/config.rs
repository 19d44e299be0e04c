//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use writeai_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "autosave_delay_ms": config.autosave_delay_ms,
                    "assistant_delay_ms": config.assistant_delay_ms,
                    "word_goal": config.word_goal,
                    "seed_examples": config.seed_examples,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!("  autosave_delay_ms:  {}", config.autosave_delay_ms);
            println!("  assistant_delay_ms: {}", config.assistant_delay_ms);
            println!("  word_goal:          {}", config.word_goal);
            println!("  seed_examples:      {}", config.seed_examples);
            println!(
                "  log_file:           {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Projects:    {}", config.projects_path().display());
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "autosave_delay_ms" => {
            config.autosave_delay_ms = value
                .parse()
                .context("Invalid value for autosave_delay_ms. Use a number of milliseconds.")?;
        }
        "assistant_delay_ms" => {
            config.assistant_delay_ms = value
                .parse()
                .context("Invalid value for assistant_delay_ms. Use a number of milliseconds.")?;
        }
        "word_goal" => {
            config.word_goal = value
                .parse()
                .context("Invalid value for word_goal. Use a number of words.")?;
        }
        "seed_examples" => {
            config.seed_examples = value
                .parse()
                .context("Invalid value for seed_examples. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, autosave_delay_ms, assistant_delay_ms, word_goal, \
                 seed_examples, log_file",
                key
            );
        }
    }
    Ok(())
}
