//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands that only need the engine run synchronously; commands that touch
//! the rule store run on the async runtime.

use crate::cli::{Cli, Commands, ConfigCommands, RuleSourceArgs, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that never touch the rule store.
pub trait LocalCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that read or write the rule store.
#[allow(async_fn_in_trait)]
pub trait StoreCommand {
    /// Execute the command.
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Commands that never touch the rule store.
pub enum LocalDispatch<'a> {
    Check(&'a str),
    Catalog,
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Try to create a local dispatch from the CLI command.
    /// Returns None if the command needs the store.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Check { rule }) => Some(Self::Check(rule)),
            Some(Commands::Catalog) => Some(Self::Catalog),
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Check(rule) => commands::check::execute(ctx, rule),
            Self::Catalog => commands::catalog::execute(ctx),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("rulectl - Parse, combine, evaluate and store eligibility rules");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that read or write the rule store.
pub enum StoreDispatch<'a> {
    Create {
        rule: &'a str,
        name: &'a Option<String>,
        no_save: bool,
    },
    Combine {
        rules: &'a [String],
        name: &'a str,
        no_save: bool,
    },
    Evaluate {
        source: &'a RuleSourceArgs,
        data: &'a str,
    },
    Rules {
        limit: Option<usize>,
    },
}

impl<'a> StoreDispatch<'a> {
    /// Create a store dispatch from the CLI command.
    /// Returns None for commands handled by [`LocalDispatch`].
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Create {
                rule,
                name,
                no_save,
            }) => Some(Self::Create {
                rule,
                name,
                no_save: *no_save,
            }),
            Some(Commands::Combine {
                rules,
                name,
                no_save,
            }) => Some(Self::Combine {
                rules,
                name,
                no_save: *no_save,
            }),
            Some(Commands::Evaluate { source, data }) => Some(Self::Evaluate { source, data }),
            Some(Commands::Rules { limit }) => Some(Self::Rules { limit: *limit }),
            _ => None,
        }
    }
}

impl StoreCommand for StoreDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Create {
                rule,
                name,
                no_save,
            } => {
                let opts = commands::create::CreateOptions {
                    rule: rule.to_string(),
                    name: (*name).clone(),
                    no_save: *no_save,
                };
                commands::create::execute(ctx, &opts).await
            }
            Self::Combine {
                rules,
                name,
                no_save,
            } => {
                let opts = commands::combine::CombineOptions {
                    rules: rules.to_vec(),
                    name: name.to_string(),
                    no_save: *no_save,
                };
                commands::combine::execute(ctx, &opts).await
            }
            Self::Evaluate { source, data } => {
                let opts = commands::evaluate::EvaluateOptions {
                    source: rule_source(source)?,
                    data: data.to_string(),
                };
                commands::evaluate::execute(ctx, &opts).await
            }
            Self::Rules { limit } => {
                let opts = commands::rules::RulesListOptions { limit: *limit };
                commands::rules::execute(ctx, &opts).await
            }
        }
    }
}

/// Converts the mutually exclusive `--rule`/`--ast`/`--id` flags into a rule source.
fn rule_source(args: &RuleSourceArgs) -> Result<commands::evaluate::RuleSource> {
    use commands::evaluate::RuleSource;

    match (&args.rule, &args.ast, &args.id) {
        (Some(rule), None, None) => Ok(RuleSource::Text(rule.clone())),
        (None, Some(ast), None) => Ok(RuleSource::Ast(ast.clone())),
        (None, None, Some(id)) => Ok(RuleSource::Id(id.clone())),
        _ => Err(CommandError::Config(
            "exactly one of --rule, --ast or --id is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use commands::evaluate::RuleSource;

    #[test]
    fn test_local_commands() {
        let cli = Cli::parse_from(["rulectl", "check", "age > 1"]);
        assert!(matches!(LocalDispatch::try_from_cli(&cli), Some(LocalDispatch::Check("age > 1"))));
        assert!(StoreDispatch::from_cli(&cli).is_none());

        let cli = Cli::parse_from(["rulectl"]);
        assert!(matches!(LocalDispatch::try_from_cli(&cli), Some(LocalDispatch::Help)));
    }

    #[test]
    fn test_store_commands() {
        let cli = Cli::parse_from(["rulectl", "rules", "--limit", "3"]);
        assert!(LocalDispatch::try_from_cli(&cli).is_none());
        assert!(matches!(
            StoreDispatch::from_cli(&cli),
            Some(StoreDispatch::Rules { limit: Some(3) })
        ));
    }

    #[test]
    fn test_rule_source() {
        let cli = Cli::parse_from(["rulectl", "evaluate", "--ast", "@tree.json", "--data", "{}"]);
        let Some(Commands::Evaluate { source, .. }) = &cli.command else {
            panic!("Expected Evaluate command");
        };
        assert!(matches!(rule_source(source).unwrap(), RuleSource::Ast(ref a) if a == "@tree.json"));
    }
}
