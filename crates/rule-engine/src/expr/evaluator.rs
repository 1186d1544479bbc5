//! Rule evaluation against data records.
//!
//! This module provides the [`RuleEvaluator`] for evaluating parsed rules against
//! [`Record`]s.
//!
//! # Semantics
//!
//! - A comparison looks its attribute up in the record. A missing attribute is an
//!   error, never a silent `false`.
//! - The record value must have the same kind as the rule's literal, which the
//!   validator guarantees is the catalog's declared kind.
//! - `AND` and `OR` evaluate their left side first and short-circuit, so a record
//!   may omit attributes that are only referenced on a branch that is not taken.
//!
//! # Example
//!
//! ```
//! use rule_engine_rs::catalog::Catalog;
//! use rule_engine_rs::expr::{Record, RuleEvaluator, RuleParser, Value};
//!
//! let catalog = Catalog::default();
//! let rule = RuleParser::parse("department = 'Sales' OR age > 30", &catalog).unwrap();
//!
//! let record: Record = [("department".to_string(), Value::from("Sales"))].into_iter().collect();
//!
//! // `age` is never looked at
//! assert!(RuleEvaluator::new(&rule).matches(&record).unwrap());
//! ```

use super::ast::{Comparison, Logic, Node, Record, Value};
use super::error::{RuleError, RuleResult};

/// Evaluates a parsed rule against records.
///
/// Holds only a shared reference to the tree, so one rule can be evaluated from
/// several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluator<'a> {
    rule: &'a Node,
}

impl<'a> RuleEvaluator<'a> {
    /// Creates a new evaluator for the given rule.
    pub fn new(rule: &'a Node) -> Self {
        Self { rule }
    }

    /// Returns true if the record satisfies the rule.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MissingAttribute` if an evaluated comparison's attribute
    /// is absent from the record, or `RuleError::TypeMismatch` if the record holds
    /// a value of the wrong kind for it.
    pub fn matches(&self, record: &Record) -> RuleResult<bool> {
        evaluate_node(self.rule, record)
    }

    /// Returns the records that satisfy the rule, in input order.
    ///
    /// # Errors
    ///
    /// Fails on the first record that cannot be evaluated.
    pub fn filter_records<'b>(&self, records: &'b [Record]) -> RuleResult<Vec<&'b Record>> {
        let mut matched = Vec::new();
        for record in records {
            if self.matches(record)? {
                matched.push(record);
            }
        }
        Ok(matched)
    }
}

/// Evaluates a rule against one record.
///
/// Shorthand for `RuleEvaluator::new(rule).matches(record)`.
pub fn evaluate(rule: &Node, record: &Record) -> RuleResult<bool> {
    RuleEvaluator::new(rule).matches(record)
}

fn evaluate_node(node: &Node, record: &Record) -> RuleResult<bool> {
    match node {
        Node::Operand(comparison) => evaluate_comparison(comparison, record),
        Node::Operator { logic, left, right } => {
            let left_result = evaluate_node(left, record)?;
            match (logic, left_result) {
                (Logic::And, false) => Ok(false),
                (Logic::Or, true) => Ok(true),
                _ => evaluate_node(right, record),
            }
        }
    }
}

fn evaluate_comparison(comparison: &Comparison, record: &Record) -> RuleResult<bool> {
    let attribute = comparison.attribute();
    let actual = record
        .get(attribute)
        .ok_or_else(|| RuleError::missing_attribute(attribute))?;

    let comparator = comparison.comparator();
    match (actual, comparison.value()) {
        (Value::Number(actual), Value::Number(expected)) => Ok(comparator.apply(actual, expected)),
        (Value::Text(actual), Value::Text(expected)) => {
            Ok(comparator.apply(actual.as_str(), expected.as_str()))
        }
        (actual, expected) => Err(RuleError::TypeMismatch {
            attribute: attribute.to_string(),
            expected: expected.kind(),
            found: actual.kind(),
            position: None,
        }),
    }
}
