//! Rule expression parser, validator, combinator, evaluator and canonical codec.
//!
//! Rules are boolean expressions over named attributes of a data record. They are
//! parsed into a validated tree once and can then be combined, evaluated against any
//! number of records, and encoded for storage.
//!
//! # Supported Syntax
//!
//! ## Comparisons
//! - `attribute > 30` - numeric attributes support `>`, `<`, `=`, `>=`, `<=`, `!=`
//! - `attribute = 'Sales'` - text attributes support `=` and `!=` only
//!
//! ## Literals
//! - Numbers: `30`, `-4`, `55.5`
//! - Strings in single or double quotes: `'Sales'`, `"R&D"`, with `\'`, `\"` and `\\`
//!   escapes
//!
//! ## Boolean Operators
//! - `AND` - binds tighter than `OR`
//! - `OR`
//! - `()` - Grouping
//!
//! Keywords are case-insensitive. Attribute names are case-sensitive and must be in
//! the [`Catalog`](crate::catalog::Catalog).
//!
//! # Example
//!
//! ```
//! use rule_engine_rs::catalog::Catalog;
//! use rule_engine_rs::expr::{canonical, combine, Record, RuleEvaluator, RuleParser, Value};
//!
//! let catalog = Catalog::default();
//!
//! // Parse and validate
//! let seniors = RuleParser::parse("age > 30 AND department = 'Sales'", &catalog).unwrap();
//! let well_paid = RuleParser::parse("salary > 50000 OR experience > 5", &catalog).unwrap();
//!
//! // Combine
//! let rule = combine([seniors, well_paid]).unwrap();
//!
//! // Evaluate
//! let record: Record = [
//!     ("age".to_string(), Value::from(35.0)),
//!     ("department".to_string(), Value::from("Sales")),
//!     ("salary".to_string(), Value::from(60000.0)),
//!     ("experience".to_string(), Value::from(3.0)),
//! ]
//! .into_iter()
//! .collect();
//! assert!(RuleEvaluator::new(&rule).matches(&record).unwrap());
//!
//! // Store and restore
//! let stored = canonical::serialize(&rule);
//! assert_eq!(canonical::deserialize(&stored, &catalog).unwrap(), rule);
//! ```

mod ast;
pub mod canonical;
mod combine;
mod error;
mod evaluator;
mod lexer;
mod parser;
pub mod validator;

pub use ast::{Comparator, Comparison, Logic, Node, Record, Value};
pub use canonical::CanonicalNode;
pub use combine::combine;
pub use error::{ErrorKind, RuleError, RuleResult};
pub use evaluator::{evaluate, RuleEvaluator};
pub use lexer::{tokenize, Lexer, PositionedToken, Token};
pub use parser::RuleParser;


#[cfg(test)]
mod evaluator_tests;
