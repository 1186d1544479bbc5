//! Output formatting utilities for the rulectl CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being shown:
//!
//! - [`rules`] - Created, combined, checked and stored rules
//! - [`evaluation`] - Evaluation results for one or many records
//! - [`catalog`] - The active attribute catalog
//! - [`helpers`] - Common formatting utilities (truncation, timestamps, headers)

mod catalog;
mod evaluation;
pub mod helpers;
mod rules;

pub use catalog::{format_catalog_json, format_catalog_table};

pub use evaluation::{format_evaluation_json, format_evaluation_text};

pub use rules::{
    format_check_json, format_check_text, format_created_rule_json, format_created_rule_text,
    format_rules_json, format_rules_table,
};
