use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{LocalCommand, LocalDispatch, StoreCommand, StoreDispatch};
use rule_engine_rs::expr::ErrorKind;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` shows debug events and `--quiet` only errors.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "debug"
        } else if cli.quiet {
            "error"
        } else {
            "warn"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    match StoreDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx).await,
        None => Err(CommandError::Config(format!(
            "unhandled command: {:?}",
            cli.command
        ))),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Rule(rule_error) => match rule_error.kind() {
            ErrorKind::Syntax => "SYNTAX_ERROR",
            ErrorKind::EmptyRule => "EMPTY_RULE",
            ErrorKind::UnknownAttribute => "UNKNOWN_ATTRIBUTE",
            ErrorKind::InvalidOperator => "INVALID_OPERATOR",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::MissingAttribute => "MISSING_ATTRIBUTE",
            ErrorKind::Deserialization => "DESERIALIZATION_ERROR",
        },
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::NotFound(_) => "NOT_FOUND",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Rule(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::NotFound(_) => ExitCode::from(4),
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Store(_) => ExitCode::from(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_engine_rs::expr::RuleError;
    use rule_store_rs::StoreError;

    #[test]
    fn test_rule_error_codes() {
        let cases = [
            (RuleError::syntax(3, "unexpected ')'"), "SYNTAX_ERROR"),
            (RuleError::EmptyRule, "EMPTY_RULE"),
            (RuleError::missing_attribute("age"), "MISSING_ATTRIBUTE"),
            (RuleError::deserialization("root", "bad"), "DESERIALIZATION_ERROR"),
        ];
        for (error, code) in cases {
            let e = CommandError::from(error);
            assert_eq!(error_code(&e), code);
            assert_eq!(error_exit_code(&e), ExitCode::from(1));
        }
    }

    #[test]
    fn test_validation_error_codes() {
        let engine = rule_engine_rs::engine::RuleEngine::default();

        let e = CommandError::from(engine.parse("agee > 1").unwrap_err());
        assert_eq!(error_code(&e), "UNKNOWN_ATTRIBUTE");

        let e = CommandError::from(engine.parse("department > 'Sales'").unwrap_err());
        assert_eq!(error_code(&e), "INVALID_OPERATOR");

        let e = CommandError::from(engine.parse("age = 'old'").unwrap_err());
        assert_eq!(error_code(&e), "TYPE_MISMATCH");
    }

    #[test]
    fn test_other_error_codes() {
        let e = CommandError::from(StoreError::NoDataDir);
        assert_eq!(error_code(&e), "STORE_ERROR");
        assert_eq!(error_exit_code(&e), ExitCode::from(5));

        let e = CommandError::NotFound("rule 'x'".to_string());
        assert_eq!(error_code(&e), "NOT_FOUND");
        assert_eq!(error_exit_code(&e), ExitCode::from(4));

        let e = CommandError::Config("bad".to_string());
        assert_eq!(error_code(&e), "CONFIG_ERROR");
        assert_eq!(error_exit_code(&e), ExitCode::from(5));

        let e = CommandError::from(std::io::Error::other("disk"));
        assert_eq!(error_code(&e), "IO_ERROR");
        assert_eq!(error_exit_code(&e), ExitCode::from(3));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = CommandError::from(json_err);
        assert_eq!(error_code(&e), "JSON_ERROR");
        assert_eq!(error_exit_code(&e), ExitCode::from(1));
    }
}
