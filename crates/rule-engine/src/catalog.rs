//! Attribute catalog.
//!
//! The catalog is the registry of attribute names a rule may reference, each with
//! the kind of value it holds. It is built once by the hosting application and is
//! read-only afterwards: the engine only ever borrows it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attributes available when no catalog is configured.
const DEFAULT_ATTRIBUTES: &[(&str, ValueKind)] = &[
    ("age", ValueKind::Numeric),
    ("department", ValueKind::Text),
    ("experience", ValueKind::Numeric),
    ("salary", ValueKind::Numeric),
];

/// The kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// A number (stored as `f64`).
    Numeric,
    /// A text string.
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Numeric => write!(f, "numeric"),
            ValueKind::Text => write!(f, "text"),
        }
    }
}

/// Registry of legal attribute names and their value kinds.
///
/// Serializes as a plain `name = kind` table so it can be embedded in a TOML
/// config file:
///
/// ```
/// use rule_engine_rs::catalog::{Catalog, ValueKind};
///
/// let catalog: Catalog = serde_json::from_str(r#"{"age": "numeric", "city": "text"}"#).unwrap();
/// assert_eq!(catalog.kind_of("city"), Some(ValueKind::Text));
/// assert!(!catalog.contains("salary"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    attributes: BTreeMap<String, ValueKind>,
}

impl Catalog {
    /// Creates an empty catalog. Every attribute reference fails against it.
    pub fn empty() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the catalog with one more attribute declared.
    ///
    /// Declaring a name twice keeps the last kind.
    pub fn with_attribute(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.attributes.insert(name.into(), kind);
        self
    }

    /// Returns the declared kind of an attribute, if it is in the catalog.
    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.attributes.get(name).copied()
    }

    /// Returns true if the attribute is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterates over attribute names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Iterates over `(name, kind)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ValueKind)> {
        self.attributes
            .iter()
            .map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if no attribute is declared.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        DEFAULT_ATTRIBUTES
            .iter()
            .map(|(name, kind)| (name.to_string(), *kind))
            .collect()
    }
}

impl FromIterator<(String, ValueKind)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (String, ValueKind)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
