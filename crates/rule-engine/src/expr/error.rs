//! Error types for the rule expression engine.

use thiserror::Error;

use crate::catalog::ValueKind;

/// A specialized Result type for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors produced while parsing, validating, evaluating or decoding a rule.
///
/// Every error is a deterministic function of the input; nothing is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// Invalid character, unbalanced parentheses or malformed grammar.
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        /// Byte offset into the rule text.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The rule text contains no comparison.
    #[error("rule is empty")]
    EmptyRule,

    /// The attribute is not in the catalog.
    #[error("unknown attribute '{name}'{}{}", position_suffix(.position), suggestion_suffix(.suggestion))]
    UnknownAttribute {
        /// The attribute as written.
        name: String,
        /// Byte offset into the rule text, when parsed from text.
        position: Option<usize>,
        /// Closest catalog name, if one is close enough.
        suggestion: Option<String>,
    },

    /// The comparator cannot be applied to the attribute's kind.
    #[error("operator '{comparator}' is not valid for {kind} attribute '{attribute}'{}", position_suffix(.position))]
    InvalidOperator {
        /// The attribute being compared.
        attribute: String,
        /// The comparator symbol.
        comparator: String,
        /// The attribute's declared kind.
        kind: ValueKind,
        /// Byte offset into the rule text, when parsed from text.
        position: Option<usize>,
    },

    /// A literal or record value does not have the attribute's declared kind.
    #[error("type mismatch for attribute '{attribute}': expected {expected}, found {found}{}", position_suffix(.position))]
    TypeMismatch {
        /// The attribute being compared.
        attribute: String,
        /// The attribute's declared kind.
        expected: ValueKind,
        /// The kind actually supplied.
        found: ValueKind,
        /// Byte offset into the rule text, when parsed from text.
        position: Option<usize>,
    },

    /// The record has no value for an attribute the evaluation needed.
    #[error("record is missing attribute '{attribute}'")]
    MissingAttribute {
        /// The missing attribute.
        attribute: String,
    },

    /// A canonical tree is malformed or fails re-validation.
    #[error("invalid canonical tree at {path}: {message}")]
    Deserialization {
        /// Location of the offending node, e.g. `root.left.right`.
        path: String,
        /// What went wrong.
        message: String,
    },
}

/// Coarse classification of a [`RuleError`], for transports that map kinds to statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    EmptyRule,
    UnknownAttribute,
    InvalidOperator,
    TypeMismatch,
    MissingAttribute,
    Deserialization,
}

impl RuleError {
    /// Creates a syntax error.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        RuleError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Creates a syntax error for a character that cannot start a token.
    pub fn unexpected_character(position: usize, character: char) -> Self {
        Self::syntax(position, format!("unexpected character '{}'", character))
    }

    /// Creates a deserialization error.
    pub fn deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        RuleError::Deserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a missing attribute error.
    pub fn missing_attribute(attribute: impl Into<String>) -> Self {
        RuleError::MissingAttribute {
            attribute: attribute.into(),
        }
    }

    /// Attaches a source position to a validation error that has none yet.
    ///
    /// Other variants are returned unchanged.
    pub fn at(mut self, offset: usize) -> Self {
        match &mut self {
            RuleError::UnknownAttribute { position, .. }
            | RuleError::InvalidOperator { position, .. }
            | RuleError::TypeMismatch { position, .. } => {
                position.get_or_insert(offset);
            }
            _ => {}
        }
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleError::Syntax { .. } => ErrorKind::Syntax,
            RuleError::EmptyRule => ErrorKind::EmptyRule,
            RuleError::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            RuleError::InvalidOperator { .. } => ErrorKind::InvalidOperator,
            RuleError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            RuleError::MissingAttribute { .. } => ErrorKind::MissingAttribute,
            RuleError::Deserialization { .. } => ErrorKind::Deserialization,
        }
    }

    /// Returns the source position, if the error carries one.
    pub fn position(&self) -> Option<usize> {
        match self {
            RuleError::Syntax { position, .. } => Some(*position),
            RuleError::UnknownAttribute { position, .. }
            | RuleError::InvalidOperator { position, .. }
            | RuleError::TypeMismatch { position, .. } => *position,
            _ => None,
        }
    }
}

fn position_suffix(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!(" at position {}", p),
        None => String::new(),
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}
