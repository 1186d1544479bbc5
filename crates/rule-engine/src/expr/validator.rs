//! Validation checks shared by the parser and the canonical decoder.
//!
//! Each check is a pure function of the catalog and its arguments. The parser runs
//! them as soon as a comparison is read; the decoder runs them again on every
//! stored comparison, so a tree saved under a different catalog is rejected rather
//! than silently accepted.

use strsim::levenshtein;

use super::ast::{Comparator, Comparison, Value};
use super::error::{RuleError, RuleResult};
use crate::catalog::{Catalog, ValueKind};

/// Maximum Levenshtein distance to consider a catalog name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Checks that `name` is in the catalog and returns its declared kind.
///
/// # Errors
///
/// Returns `RuleError::UnknownAttribute`, with the closest catalog name as a
/// suggestion when one is within a small edit distance.
pub fn attribute_known(catalog: &Catalog, name: &str) -> RuleResult<ValueKind> {
    catalog
        .kind_of(name)
        .ok_or_else(|| RuleError::UnknownAttribute {
            name: name.to_string(),
            position: None,
            suggestion: find_similar_name(name, catalog.names()),
        })
}

/// Checks that `comparator` may be applied to an attribute of `kind`.
///
/// Equality applies to both kinds; ordering applies to numbers only.
///
/// # Errors
///
/// Returns `RuleError::InvalidOperator` for an ordering comparator on text.
pub fn operator_valid(attribute: &str, comparator: Comparator, kind: ValueKind) -> RuleResult<()> {
    if comparator.is_ordering() && kind != ValueKind::Numeric {
        return Err(RuleError::InvalidOperator {
            attribute: attribute.to_string(),
            comparator: comparator.symbol().to_string(),
            kind,
            position: None,
        });
    }
    Ok(())
}

/// Checks that `value` has the attribute's declared kind.
///
/// # Errors
///
/// Returns `RuleError::TypeMismatch` otherwise.
pub fn literal_matches(attribute: &str, kind: ValueKind, value: &Value) -> RuleResult<()> {
    if value.kind() != kind {
        return Err(RuleError::TypeMismatch {
            attribute: attribute.to_string(),
            expected: kind,
            found: value.kind(),
            position: None,
        });
    }
    Ok(())
}

/// Runs all three checks, in order, and builds the comparison.
///
/// The first failing check wins.
pub(crate) fn checked_comparison(
    catalog: &Catalog,
    attribute: &str,
    comparator: Comparator,
    value: Value,
) -> RuleResult<Comparison> {
    let kind = attribute_known(catalog, attribute)?;
    operator_valid(attribute, comparator, kind)?;
    literal_matches(attribute, kind, &value)?;
    Ok(Comparison::new(attribute, comparator, value))
}

/// Finds the closest name among `candidates` using Levenshtein distance.
///
/// Returns `None` for an exact match or when nothing is close enough.
fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    // Distance is case-insensitive, so a zero distance may still differ by case
    if best_distance <= MAX_SUGGESTION_DISTANCE && best_match != query {
        Some(best_match.to_string())
    } else {
        None
    }
}
