//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for rulectl.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// rulectl - Parse, combine, evaluate and store eligibility rules
#[derive(Parser, Debug)]
#[command(name = "rulectl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Rule store file (default: from config, then the XDG data directory)
    #[arg(long, global = true, env = "RULECTL_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a rule, print its canonical tree and save it
    #[command(alias = "c")]
    Create {
        /// Rule text, e.g. "age > 30 AND department = 'Sales'"
        rule: String,

        /// Label for the stored rule
        #[arg(short, long)]
        name: Option<String>,

        /// Parse and print without saving
        #[arg(long)]
        no_save: bool,
    },

    /// Combine several rules with AND and save the result
    Combine {
        /// Rule texts, combined left to right
        #[arg(required = true, num_args = 1..)]
        rules: Vec<String>,

        /// Label for the stored rule
        #[arg(short, long, default_value = "combined_rule")]
        name: String,

        /// Combine and print without saving
        #[arg(long)]
        no_save: bool,
    },

    /// Evaluate a rule against one record or an array of records
    #[command(alias = "e")]
    Evaluate {
        #[command(flatten)]
        source: RuleSourceArgs,

        /// Record JSON, or @path to read it from a file ("-" reads stdin)
        #[arg(short, long)]
        data: String,
    },

    /// Parse a rule and print it in normalized form without saving
    Check {
        /// Rule text
        rule: String,
    },

    /// List stored rules
    #[command(alias = "ls")]
    Rules {
        /// Limit results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the active attribute catalog
    Catalog,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Where the rule to evaluate comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RuleSourceArgs {
    /// Rule text
    #[arg(short, long)]
    pub rule: Option<String>,

    /// Canonical tree JSON, or @path to read it from a file
    #[arg(long)]
    pub ast: Option<String>,

    /// Id of a stored rule
    #[arg(long)]
    pub id: Option<String>,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (store_path, output.color, catalog.<attribute>)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
