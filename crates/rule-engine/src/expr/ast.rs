//! Abstract Syntax Tree (AST) for rule expressions.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ValueKind;

/// A data record: attribute name to value, supplied fresh for each evaluation.
pub type Record = HashMap<String, Value>;

/// A literal in a rule, or a value in a record.
///
/// Deserializes untagged, so a JSON record such as `{"age": 35, "department": "Sales"}`
/// maps directly onto a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Numeric,
            Value::Text(_) => ValueKind::Text,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    /// Formats the value as it would be written in rule text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "'")
            }
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `!=`
    Ne,
}

impl Comparator {
    /// Returns the symbol used in rule text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Eq => "=",
            Comparator::Ge => ">=",
            Comparator::Le => "<=",
            Comparator::Ne => "!=",
        }
    }

    /// Returns true for the ordering comparators, which only apply to numbers.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Comparator::Eq | Comparator::Ne)
    }

    /// Applies the comparator as `left <op> right`.
    pub fn apply<T: PartialOrd + ?Sized>(&self, left: &T, right: &T) -> bool {
        match self {
            Comparator::Gt => left > right,
            Comparator::Lt => left < right,
            Comparator::Eq => left == right,
            Comparator::Ge => left >= right,
            Comparator::Le => left <= right,
            Comparator::Ne => left != right,
        }
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Comparator::Gt),
            "<" => Ok(Comparator::Lt),
            "=" => Ok(Comparator::Eq),
            ">=" => Ok(Comparator::Ge),
            "<=" => Ok(Comparator::Le),
            "!=" => Ok(Comparator::Ne),
            other => Err(format!("unknown comparator '{}'", other)),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A logical connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

impl Logic {
    /// Returns the keyword used in rule text and in the canonical form.
    pub fn keyword(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }

    /// Binding strength: higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Logic::Or => 1,
            Logic::And => 2,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One attribute comparison: `attribute comparator value`.
///
/// A `Comparison` can only be built inside this crate, after the validator has
/// accepted it, so every one in existence satisfies the catalog it was checked
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    attribute: String,
    comparator: Comparator,
    value: Value,
}

impl Comparison {
    pub(crate) fn new(attribute: impl Into<String>, comparator: Comparator, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            value,
        }
    }

    /// The attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The comparator.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// The literal the attribute is compared against.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.comparator, self.value)
    }
}

/// A parsed rule.
///
/// A strict binary tree: leaves are comparisons, internal nodes are AND/OR with
/// exactly two owned children. Trees are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf comparison.
    Operand(Comparison),

    /// Logical connective over two subtrees.
    Operator {
        /// AND or OR.
        logic: Logic,
        /// Left subtree, evaluated first.
        left: Box<Node>,
        /// Right subtree.
        right: Box<Node>,
    },
}

impl Node {
    pub(crate) fn operand(comparison: Comparison) -> Self {
        Node::Operand(comparison)
    }

    pub(crate) fn operator(logic: Logic, left: Node, right: Node) -> Self {
        Node::Operator {
            logic,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an AND node from two rules.
    pub fn and(left: Node, right: Node) -> Self {
        Self::operator(Logic::And, left, right)
    }

    /// Creates an OR node from two rules.
    pub fn or(left: Node, right: Node) -> Self {
        Self::operator(Logic::Or, left, right)
    }

    /// Returns true for a leaf comparison.
    pub fn is_operand(&self) -> bool {
        matches!(self, Node::Operand(_))
    }

    /// Number of comparisons in the tree.
    pub fn operand_count(&self) -> usize {
        match self {
            Node::Operand(_) => 1,
            Node::Operator { left, right, .. } => left.operand_count() + right.operand_count(),
        }
    }

    /// Height of the tree; a single comparison has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::Operand(_) => 1,
            Node::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// The distinct attributes referenced anywhere in the tree.
    pub fn attributes(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_attributes(&mut names);
        names
    }

    fn collect_attributes<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Node::Operand(comparison) => {
                names.insert(comparison.attribute());
            }
            Node::Operator { left, right, .. } => {
                left.collect_attributes(names);
                right.collect_attributes(names);
            }
        }
    }

    /// Writes a child, parenthesized when re-parsing would otherwise change the shape.
    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parent: Logic, is_right: bool) -> fmt::Result {
        let needs_parens = match self {
            Node::Operand(_) => false,
            Node::Operator { logic, .. } => {
                logic.precedence() < parent.precedence() || (is_right && *logic == parent)
            }
        };
        if needs_parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Node {
    /// Formats the tree as rule text that parses back to the same tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Operand(comparison) => write!(f, "{}", comparison),
            Node::Operator { logic, left, right } => {
                left.fmt_child(f, *logic, false)?;
                write!(f, " {} ", logic)?;
                right.fmt_child(f, *logic, true)
            }
        }
    }
}
