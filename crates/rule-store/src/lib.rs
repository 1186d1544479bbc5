//! Persistent storage for serialized rules.
//!
//! The store keeps every saved rule as a [`RuleRecord`]: the rule text as the user
//! wrote it, plus its canonical tree. Records live in a single JSON document that
//! mirrors [`RuleDocument`]. The store moves payloads only; parsing and validation
//! belong to the engine.

use chrono::{DateTime, Utc};
use rule_engine_rs::expr::CanonicalNode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod store;

pub use store::{Result, RuleStore, StoreError};

/// Current version of the on-disk document layout.
pub const DOCUMENT_VERSION: u32 = 1;

/// One stored rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Unique id assigned when the rule is saved.
    pub id: Uuid,

    /// Optional label, e.g. `combined_rule` for the output of a combine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The rule as originally written.
    pub rule_text: String,

    /// The canonical tree, as produced by the engine's serializer.
    pub ast: CanonicalNode,

    /// UTC timestamp of the save.
    pub saved_at: DateTime<Utc>,
}

impl RuleRecord {
    /// Creates a record with a fresh id, stamped with the current time.
    pub fn new(name: Option<String>, rule_text: impl Into<String>, ast: CanonicalNode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            rule_text: rule_text.into(),
            ast,
            saved_at: Utc::now(),
        }
    }
}

/// The whole store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Layout version, see [`DOCUMENT_VERSION`].
    pub version: u32,

    /// Saved rules, oldest first.
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
}

impl Default for RuleDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            rules: Vec::new(),
        }
    }
}
