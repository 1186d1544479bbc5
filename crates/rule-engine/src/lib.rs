//! Rule expression engine.
//!
//! Parses textual eligibility rules such as
//! `(age > 30 AND department = 'Sales') OR salary > 50000` into validated trees,
//! combines several rules into one, evaluates them against data records and encodes
//! them into a canonical form for storage.
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use rule_engine_rs::prelude::*;
//!
//! let engine = RuleEngine::default();
//! let rule = engine.parse("age > 30 AND department = 'Sales'").unwrap();
//! let record: Record = serde_json::from_str(r#"{"age": 35, "department": "Sales"}"#).unwrap();
//! assert_eq!(engine.evaluate(&rule, &record), Ok(true));
//! ```
//!
//! The engine does no I/O and keeps no state beyond its [`Catalog`](catalog::Catalog).

pub mod catalog;
pub mod engine;
pub mod expr;
pub mod prelude;
