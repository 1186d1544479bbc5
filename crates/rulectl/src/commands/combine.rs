//! Combine command implementation.
//!
//! Parses every rule, joins them with AND and stores the result under a name.

use rule_engine_rs::expr::RuleError;
use tracing::debug;

use super::create::{persist, print_created};
use super::{CommandContext, Result};

/// Name combined rules are stored under unless one is given.
pub const DEFAULT_COMBINED_NAME: &str = "combined_rule";

/// Options for the combine command.
#[derive(Debug)]
pub struct CombineOptions {
    /// Rule texts, combined left to right.
    pub rules: Vec<String>,
    /// Label for the stored rule.
    pub name: String,
    /// Combine and print without saving.
    pub no_save: bool,
}

/// Executes the combine command.
///
/// The stored text is the normalized text of the combined tree, so it parses
/// back to the same tree.
///
/// # Errors
///
/// Returns the first rule error among the inputs, `RuleError::EmptyRule` if no
/// rule was given, or a store error if saving fails.
pub async fn execute(ctx: &CommandContext, opts: &CombineOptions) -> Result<()> {
    let combined = ctx
        .engine
        .parse_and_combine(&opts.rules)?
        .ok_or(RuleError::EmptyRule)?;
    debug!(inputs = opts.rules.len(), operands = combined.operand_count(), "combined rules");

    let ast = ctx.engine.serialize(&combined);
    let result = persist(
        ctx,
        Some(opts.name.clone()),
        combined.to_string(),
        ast,
        opts.no_save,
    )
    .await?;
    print_created(ctx, &result)
}
