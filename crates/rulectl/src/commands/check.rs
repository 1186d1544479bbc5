//! Check command implementation.
//!
//! Parses a rule without saving it and prints its normalized text.

use super::{CommandContext, Result};
use crate::output::{format_check_json, format_check_text};

/// Executes the check command.
///
/// # Errors
///
/// Returns the rule error if the text does not parse.
pub fn execute(ctx: &CommandContext, rule: &str) -> Result<()> {
    let rule = ctx.engine.parse(rule)?;

    if ctx.json_output {
        let output = format_check_json(&rule)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_check_text(&rule));
    }

    Ok(())
}
