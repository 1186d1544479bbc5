//! Evaluate command implementation.
//!
//! Evaluates a rule, given as text, as a canonical tree or by stored id,
//! against one record or an array of records.

use rule_engine_rs::expr::{Node, Record, RuleResult};
use tracing::debug;
use uuid::Uuid;

use super::{read_argument, CommandContext, CommandError, Result};
use crate::output::{format_evaluation_json, format_evaluation_text};

/// Where the rule comes from.
#[derive(Debug)]
pub enum RuleSource {
    /// Rule text.
    Text(String),
    /// Canonical tree JSON, inline or `@path`.
    Ast(String),
    /// Id of a stored rule.
    Id(String),
}

/// Options for the evaluate command.
#[derive(Debug)]
pub struct EvaluateOptions {
    /// The rule to evaluate.
    pub source: RuleSource,
    /// Record JSON, inline or `@path`.
    pub data: String,
}

/// Executes the evaluate command.
///
/// # Errors
///
/// - Returns a rule error if the rule does not parse or decode, or if a record
///   is missing an attribute or has a value of the wrong kind.
/// - Returns `CommandError::NotFound` if `--id` names no stored rule.
/// - Returns `CommandError::Json` if the data is not an object or an array of objects.
pub async fn execute(ctx: &CommandContext, opts: &EvaluateOptions) -> Result<()> {
    let rule = load_rule(ctx, &opts.source).await?;
    let (records, batch) = parse_records(&read_argument(&opts.data)?)?;
    debug!(records = records.len(), batch, "evaluating rule");

    let results = records
        .iter()
        .map(|record| ctx.engine.evaluate(&rule, record))
        .collect::<RuleResult<Vec<bool>>>()?;

    if ctx.json_output {
        let output = format_evaluation_json(&rule.to_string(), &results, batch)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_evaluation_text(&results, ctx.use_colors));
    }

    Ok(())
}

/// Builds the rule tree from its source.
async fn load_rule(ctx: &CommandContext, source: &RuleSource) -> Result<Node> {
    match source {
        RuleSource::Text(text) => Ok(ctx.engine.parse(text)?),
        RuleSource::Ast(ast) => Ok(ctx.engine.deserialize_json(&read_argument(ast)?)?),
        RuleSource::Id(id) => {
            let not_found = || CommandError::NotFound(format!("rule '{}'", id));
            let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;
            let record = ctx.store()?.find_async(&uuid).await?.ok_or_else(not_found)?;
            debug!(id = %record.id, "loaded stored rule");
            Ok(ctx.engine.deserialize(&record.ast)?)
        }
    }
}

/// Parses record data: a single object or an array of objects.
///
/// Returns the records and whether the input was an array.
fn parse_records(data: &str) -> Result<(Vec<Record>, bool)> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    if value.is_array() {
        Ok((serde_json::from_value(value)?, true))
    } else {
        Ok((vec![serde_json::from_value(value)?], false))
    }
}
