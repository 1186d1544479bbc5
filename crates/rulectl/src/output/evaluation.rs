//! Evaluation output formatting.

use serde::Serialize;

use super::helpers::format_outcome;

/// JSON output structure for a single-record evaluation.
#[derive(Serialize)]
pub struct EvaluationOutput<'a> {
    pub rule: &'a str,
    pub result: bool,
}

/// JSON output structure for a batch evaluation.
#[derive(Serialize)]
pub struct BatchEvaluationOutput<'a> {
    pub rule: &'a str,
    pub results: &'a [bool],
    pub matched: usize,
    pub total: usize,
}

/// Formats evaluation results as JSON.
///
/// `batch` selects the array form even for a single result, so the output mirrors the input shape.
pub fn format_evaluation_json(
    rule: &str,
    results: &[bool],
    batch: bool,
) -> Result<String, serde_json::Error> {
    if batch {
        let output = BatchEvaluationOutput {
            rule,
            results,
            matched: results.iter().filter(|r| **r).count(),
            total: results.len(),
        };
        serde_json::to_string_pretty(&output)
    } else {
        let output = EvaluationOutput {
            rule,
            result: results.first().copied().unwrap_or(false),
        };
        serde_json::to_string_pretty(&output)
    }
}

/// Formats evaluation results one per line.
pub fn format_evaluation_text(results: &[bool], use_colors: bool) -> String {
    let mut output = String::new();
    for result in results {
        output.push_str(&format_outcome(*result, use_colors));
        output.push('\n');
    }
    output
}
