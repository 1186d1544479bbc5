//! Combining several rules into one.

use super::ast::Node;

/// Folds rules into a single rule with AND, left to right.
///
/// - no rules: `None`, the empty rule; callers must handle it before evaluating
/// - one rule: that rule, unchanged
/// - more: `((r0 AND r1) AND r2) AND ...`
///
/// # Example
///
/// ```
/// use rule_engine_rs::catalog::Catalog;
/// use rule_engine_rs::expr::{combine, RuleParser};
///
/// let catalog = Catalog::default();
/// let a = RuleParser::parse("age > 30", &catalog).unwrap();
/// let b = RuleParser::parse("salary > 50000", &catalog).unwrap();
///
/// assert!(combine(Vec::new()).is_none());
/// assert_eq!(combine(vec![a.clone()]), Some(a.clone()));
/// assert_eq!(combine(vec![a, b]).unwrap().to_string(), "age > 30 AND salary > 50000");
/// ```
pub fn combine<I>(rules: I) -> Option<Node>
where
    I: IntoIterator<Item = Node>,
{
    rules.into_iter().reduce(Node::and)
}
