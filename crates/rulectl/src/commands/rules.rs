//! Rules command implementation.
//!
//! Lists the rules in the store, oldest first.

use rule_store_rs::RuleRecord;

use super::{CommandContext, Result};
use crate::output::{format_rules_json, format_rules_table};

/// Options for the rules list command.
#[derive(Debug, Default)]
pub struct RulesListOptions {
    /// Limit results.
    pub limit: Option<usize>,
}

/// Executes the rules list command.
///
/// # Errors
///
/// Returns a store error if the store file cannot be read.
pub async fn execute(ctx: &CommandContext, opts: &RulesListOptions) -> Result<()> {
    let store = ctx.store()?;
    if ctx.verbose {
        eprintln!("Reading rules from {}", store.path().display());
    }

    let rules = apply_limit(store.load_all_async().await?, opts);

    if ctx.json_output {
        let output = format_rules_json(&rules)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_rules_table(&rules, ctx.use_colors));
    }

    Ok(())
}

/// Applies the limit to the rules.
fn apply_limit(mut rules: Vec<RuleRecord>, opts: &RulesListOptions) -> Vec<RuleRecord> {
    if let Some(limit) = opts.limit {
        rules.truncate(limit);
    }
    rules
}
