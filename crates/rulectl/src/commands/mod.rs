//! Command implementations for rulectl.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod catalog;
pub mod check;
pub mod combine;
pub mod completions;
pub mod config;
pub mod create;
pub mod evaluate;
pub mod rules;

use std::env;
use std::path::PathBuf;

use rule_engine_rs::engine::RuleEngine;
use rule_engine_rs::expr::RuleError;
use rule_store_rs::{RuleStore, StoreError};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Rule parsing, validation, evaluation or decoding error.
    #[error("{0}")]
    Rule(#[from] RuleError),

    /// Rule store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored rule that was asked for does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Engine over the configured catalog.
    pub engine: RuleEngine,
    /// Store path from `--store` or the config file, if either is set.
    store_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Colors are on unless `--no-color`, `output.color = false` or `NO_COLOR` says otherwise.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let use_colors = !cli.no_color
            && config.output.color.unwrap_or(true)
            && env::var_os("NO_COLOR").is_none();

        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
            engine: RuleEngine::new(config.active_catalog()),
            store_path: cli.store.clone().or_else(|| config.store_path.clone()),
        }
    }

    /// Opens the rule store: `--store`, then `store_path` from config, then the XDG default.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if no path is configured and the home
    /// directory cannot be determined.
    pub fn store(&self) -> Result<RuleStore> {
        match &self.store_path {
            Some(path) => Ok(RuleStore::with_path(path.clone())),
            None => Ok(RuleStore::new()?),
        }
    }
}

/// Reads a command argument that is either inline text or `@path`.
///
/// `@-` reads standard input.
pub(crate) fn read_argument(value: &str) -> Result<String> {
    match value.strip_prefix('@') {
        Some("-") => Ok(std::io::read_to_string(std::io::stdin())?),
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(value.to_string()),
    }
}
