//! Rule output formatting.

use owo_colors::OwoColorize;
use rule_engine_rs::expr::{CanonicalNode, Node};
use rule_store_rs::RuleRecord;
use serde::Serialize;

use crate::commands::create::RuleCreateResult;

use super::helpers::{format_header, format_saved_at, truncate_id, truncate_str};

/// JSON output structure for a created or combined rule.
#[derive(Serialize)]
pub struct CreatedRuleOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub rule: &'a str,
    pub saved: bool,
    pub ast: &'a CanonicalNode,
}

/// Formats a created rule as JSON.
pub fn format_created_rule_json(result: &RuleCreateResult) -> Result<String, serde_json::Error> {
    let output = CreatedRuleOutput {
        id: result.id.map(|id| id.to_string()),
        name: result.name.as_deref(),
        rule: &result.rule_text,
        saved: result.id.is_some(),
        ast: &result.ast,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a created rule for humans: a status line followed by the canonical tree.
pub fn format_created_rule_text(
    result: &RuleCreateResult,
    use_colors: bool,
) -> Result<String, serde_json::Error> {
    let mut output = String::new();

    let status = match (&result.id, &result.name) {
        (Some(id), Some(name)) => format!("Saved rule {} ({})", truncate_id(&id.to_string()), name),
        (Some(id), None) => format!("Saved rule {}", truncate_id(&id.to_string())),
        (None, _) => "Parsed rule (not saved)".to_string(),
    };
    if use_colors {
        output.push_str(&format!("{}\n", status.green()));
    } else {
        output.push_str(&status);
        output.push('\n');
    }

    output.push_str(&format!("Rule: {}\n", result.rule_text));
    output.push_str(&serde_json::to_string_pretty(&result.ast)?);
    output.push('\n');

    Ok(output)
}

/// JSON output structure for the rules list command.
#[derive(Serialize)]
pub struct RulesListOutput<'a> {
    pub rules: &'a [RuleRecord],
}

/// Formats stored rules as JSON.
pub fn format_rules_json(rules: &[RuleRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RulesListOutput { rules })
}

/// Formats stored rules as a table.
pub fn format_rules_table(rules: &[RuleRecord], use_colors: bool) -> String {
    if rules.is_empty() {
        return "No rules found.\n".to_string();
    }

    let mut output = format_header(
        &format!("{:<8} {:<16} {:<16} {}", "ID", "Name", "Saved", "Rule"),
        use_colors,
    );

    for rule in rules {
        let line = format!(
            "{:<8} {:<16} {:<16} {}",
            truncate_id(&rule.id.to_string()),
            truncate_str(rule.name.as_deref().unwrap_or(""), 16),
            format_saved_at(&rule.saved_at),
            truncate_str(&rule.rule_text, 60)
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub valid: bool,
    pub rule: String,
    pub attributes: Vec<&'a str>,
    pub operands: usize,
    pub depth: usize,
}

/// Formats a checked rule as JSON.
pub fn format_check_json(rule: &Node) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        valid: true,
        rule: rule.to_string(),
        attributes: rule.attributes().into_iter().collect(),
        operands: rule.operand_count(),
        depth: rule.depth(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a checked rule as its normalized text.
pub fn format_check_text(rule: &Node) -> String {
    format!("{rule}\n")
}
