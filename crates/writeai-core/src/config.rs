//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/writeai/config.toml)
//! 3. Environment variables (WRITEAI_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_WORD_GOAL;

/// Environment variable prefix
const ENV_PREFIX: &str = "WRITEAI";

/// Name of the durable slot holding the project snapshot
pub const PROJECTS_SLOT: &str = "writeai_projects";

/// Quiet interval before an edit is auto-saved
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

/// Simulated assistant "thinking" time
pub const DEFAULT_ASSISTANT_DELAY_MS: u64 = 1500;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (project snapshot, logs)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Auto-save quiet interval in milliseconds
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Assistant reply delay in milliseconds
    #[serde(default = "default_assistant_delay_ms")]
    pub assistant_delay_ms: u64,

    /// Session word goal shown with the statistics
    #[serde(default = "default_word_goal")]
    pub word_goal: usize,

    /// Seed the example projects when no snapshot exists
    #[serde(default = "default_seed_examples")]
    pub seed_examples: bool,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            assistant_delay_ms: DEFAULT_ASSISTANT_DELAY_MS,
            word_goal: DEFAULT_WORD_GOAL,
            seed_examples: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (WRITEAI_DATA_DIR, WRITEAI_AUTOSAVE_DELAY_MS,
    ///    WRITEAI_WORD_GOAL, WRITEAI_SEED_EXAMPLES)
    /// 2. Config file (~/.config/writeai/config.toml or WRITEAI_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from a path given on the command line, or the default location
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // WRITEAI_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.data_dir = PathBuf::from(val);
            }
        }

        // WRITEAI_AUTOSAVE_DELAY_MS (ignored unless it parses)
        if let Ok(val) = std::env::var(format!("{}_AUTOSAVE_DELAY_MS", ENV_PREFIX)) {
            match val.trim().parse() {
                Ok(ms) => self.autosave_delay_ms = ms,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid WRITEAI_AUTOSAVE_DELAY_MS"),
            }
        }

        // WRITEAI_WORD_GOAL
        if let Ok(val) = std::env::var(format!("{}_WORD_GOAL", ENV_PREFIX)) {
            match val.trim().parse() {
                Ok(goal) => self.word_goal = goal,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid WRITEAI_WORD_GOAL"),
            }
        }

        // WRITEAI_SEED_EXAMPLES
        if let Ok(val) = std::env::var(format!("{}_SEED_EXAMPLES", ENV_PREFIX)) {
            self.seed_examples = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with WRITEAI_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("writeai")
            .join("config.toml")
    }

    /// Get the path to the project snapshot
    pub fn projects_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", PROJECTS_SLOT))
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn assistant_delay(&self) -> Duration {
        Duration::from_millis(self.assistant_delay_ms)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("writeai")
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_assistant_delay_ms() -> u64 {
    DEFAULT_ASSISTANT_DELAY_MS
}

fn default_word_goal() -> usize {
    DEFAULT_WORD_GOAL
}

fn default_seed_examples() -> bool {
    true
}
