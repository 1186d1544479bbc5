//! Create command implementation.
//!
//! Parses a rule, prints its canonical tree and appends it to the rule store.

use rule_engine_rs::expr::CanonicalNode;
use tracing::debug;
use uuid::Uuid;

use super::{CommandContext, Result};
use crate::output::{format_created_rule_json, format_created_rule_text};

/// Options for the create command.
#[derive(Debug)]
pub struct CreateOptions {
    /// Rule text.
    pub rule: String,
    /// Label for the stored rule.
    pub name: Option<String>,
    /// Parse and print without saving.
    pub no_save: bool,
}

/// Result of a create or combine command.
#[derive(Debug)]
pub struct RuleCreateResult {
    /// Id of the stored rule, `None` when not saved.
    pub id: Option<Uuid>,
    /// Label the rule was stored under.
    pub name: Option<String>,
    /// The rule text as stored.
    pub rule_text: String,
    /// Canonical tree.
    pub ast: CanonicalNode,
}

/// Executes the create command.
///
/// # Errors
///
/// Returns a rule error if the text does not parse, or a store error if saving fails.
pub async fn execute(ctx: &CommandContext, opts: &CreateOptions) -> Result<()> {
    let rule = ctx.engine.parse(&opts.rule)?;
    let ast = ctx.engine.serialize(&rule);
    debug!(operands = rule.operand_count(), depth = rule.depth(), "parsed rule");

    let result = persist(ctx, opts.name.clone(), opts.rule.clone(), ast, opts.no_save).await?;
    print_created(ctx, &result)
}

/// Saves a serialized rule unless `no_save` is set.
pub(crate) async fn persist(
    ctx: &CommandContext,
    name: Option<String>,
    rule_text: String,
    ast: CanonicalNode,
    no_save: bool,
) -> Result<RuleCreateResult> {
    if no_save {
        return Ok(RuleCreateResult {
            id: None,
            name,
            rule_text,
            ast,
        });
    }

    let store = ctx.store()?;
    if ctx.verbose {
        eprintln!("Saving rule to {}", store.path().display());
    }

    let record = match &name {
        Some(name) => store.save_named_async(name, &rule_text, ast).await?,
        None => store.save_async(&rule_text, ast).await?,
    };

    Ok(RuleCreateResult {
        id: Some(record.id),
        name: record.name,
        rule_text: record.rule_text,
        ast: record.ast,
    })
}

/// Prints a created or combined rule.
pub(crate) fn print_created(ctx: &CommandContext, result: &RuleCreateResult) -> Result<()> {
    if ctx.json_output {
        let output = format_created_rule_json(result)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_created_rule_text(result, ctx.use_colors)?;
        print!("{output}");
    }

    Ok(())
}
