//! Catalog-bound entry point.

use crate::catalog::Catalog;
use crate::expr::{self, canonical, CanonicalNode, Node, Record, RuleResult};

/// The engine bundles a catalog with the rule operations that need one.
///
/// Every operation is a pure function of its arguments and the catalog. The engine
/// holds no other state, so a single instance can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    catalog: Catalog,
}

impl RuleEngine {
    /// Creates an engine over the given catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// The catalog rules are validated against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parses and validates rule text.
    ///
    /// # Errors
    ///
    /// See [`RuleParser::parse`](crate::expr::RuleParser::parse).
    pub fn parse(&self, text: &str) -> RuleResult<Node> {
        expr::RuleParser::parse(text, &self.catalog)
    }

    /// Parses every rule text and folds the results with AND.
    ///
    /// Returns `Ok(None)` for an empty list.
    ///
    /// # Errors
    ///
    /// Returns the first parse error, in input order.
    pub fn parse_and_combine<I, S>(&self, texts: I) -> RuleResult<Option<Node>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = texts
            .into_iter()
            .map(|text| self.parse(text.as_ref()))
            .collect::<RuleResult<Vec<_>>>()?;
        Ok(expr::combine(rules))
    }

    /// Folds already-parsed rules with AND. See [`combine`](crate::expr::combine).
    pub fn combine<I>(&self, rules: I) -> Option<Node>
    where
        I: IntoIterator<Item = Node>,
    {
        expr::combine(rules)
    }

    /// Evaluates a rule against a record.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MissingAttribute` or `RuleError::TypeMismatch`.
    pub fn evaluate(&self, rule: &Node, record: &Record) -> RuleResult<bool> {
        expr::evaluate(rule, record)
    }

    /// Encodes a rule into its canonical form.
    pub fn serialize(&self, rule: &Node) -> CanonicalNode {
        canonical::serialize(rule)
    }

    /// Decodes and re-validates a canonical tree against this engine's catalog.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Deserialization` with the path of the first bad node.
    pub fn deserialize(&self, canonical: &CanonicalNode) -> RuleResult<Node> {
        canonical::deserialize(canonical, &self.catalog)
    }

    /// Decodes a canonical tree from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Deserialization` for text that is not a canonical tree.
    pub fn deserialize_json(&self, text: &str) -> RuleResult<Node> {
        self.deserialize(&CanonicalNode::from_json_str(text)?)
    }
}
