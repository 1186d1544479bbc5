//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```
//! use rule_engine_rs::prelude::*;
//!
//! // Now you have access to:
//! // - RuleEngine, Catalog, ValueKind (setup)
//! // - Node, Comparison, Comparator, Logic, Value, Record (rule trees and data)
//! // - RuleError, RuleResult, ErrorKind (error handling)
//! // - CanonicalNode (storage form)
//! ```

// Setup
pub use crate::catalog::{Catalog, ValueKind};
pub use crate::engine::RuleEngine;

// Rule trees and data
pub use crate::expr::{Comparator, Comparison, Logic, Node, Record, Value};

// Operations
pub use crate::expr::{combine, evaluate, RuleEvaluator, RuleParser};

// Error types
pub use crate::expr::{ErrorKind, RuleError, RuleResult};

// Canonical form
pub use crate::expr::CanonicalNode;
