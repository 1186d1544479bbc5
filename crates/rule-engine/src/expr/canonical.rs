//! Canonical, storage-agnostic encoding of rule trees.
//!
//! Every node encodes as the same four-field map, in this order:
//!
//! ```json
//! {
//!   "node_type": "operator",
//!   "value": "AND",
//!   "left":  { "node_type": "operand", "value": ["age", ">", 30.0], "left": null, "right": null },
//!   "right": { "node_type": "operand", "value": ["department", "=", "Sales"], "left": null, "right": null }
//! }
//! ```
//!
//! Operands carry an `[attribute, comparator, literal]` triple and no children;
//! operators carry `"AND"` or `"OR"` and exactly two children. Decoding checks
//! that shape and re-validates every comparison against the catalog.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::ast::{Comparator, Logic, Node, Value};
use super::error::{RuleError, RuleResult};
use super::validator;
use crate::catalog::Catalog;

const OPERAND: &str = "operand";
const OPERATOR: &str = "operator";

/// One node of the canonical encoding.
///
/// Fields are deliberately loose (`node_type` is a string, `value` is raw JSON) so
/// that anything a store hands back can be read, and shape problems are reported by
/// [`deserialize`] with the path of the bad node instead of a generic serde error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalNode {
    /// `"operand"` or `"operator"`.
    pub node_type: String,
    /// The comparison triple or the logic keyword.
    pub value: Json,
    /// Left subtree; `null` for operands.
    pub left: Option<Box<CanonicalNode>>,
    /// Right subtree; `null` for operands.
    pub right: Option<Box<CanonicalNode>>,
}

impl CanonicalNode {
    /// Reads a canonical tree from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Deserialization` if the JSON does not have the
    /// canonical map layout.
    pub fn from_json_value(json: Json) -> RuleResult<Self> {
        serde_json::from_value(json).map_err(|e| RuleError::deserialization("root", e.to_string()))
    }

    /// Reads a canonical tree from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Deserialization` if the text is not JSON or not a
    /// canonical tree.
    pub fn from_json_str(text: &str) -> RuleResult<Self> {
        from_json_text(text).map_err(|e| RuleError::deserialization("root", e.to_string()))
    }
}

/// Reads JSON text with no nesting limit.
///
/// A left-folded combination of `n` rules nests `n` levels deep, past
/// serde_json's default limit of 128. The stack is grown on demand while reading.
/// Stores should read documents holding canonical trees through this too.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed JSON, a shape mismatch or trailing characters.
pub fn from_json_text<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut json = serde_json::Deserializer::from_str(text);
    json.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

/// Encodes a tree into its canonical form.
///
/// A structural mirror of the tree: nothing is reordered or dropped.
pub fn serialize(node: &Node) -> CanonicalNode {
    match node {
        Node::Operand(comparison) => CanonicalNode {
            node_type: OPERAND.to_string(),
            value: Json::Array(vec![
                Json::String(comparison.attribute().to_string()),
                Json::String(comparison.comparator().symbol().to_string()),
                literal_to_json(comparison.value()),
            ]),
            left: None,
            right: None,
        },
        Node::Operator { logic, left, right } => CanonicalNode {
            node_type: OPERATOR.to_string(),
            value: Json::String(logic.keyword().to_string()),
            left: Some(Box::new(serialize(left))),
            right: Some(Box::new(serialize(right))),
        },
    }
}

/// Rebuilds a tree from its canonical form, re-validating every comparison.
///
/// # Errors
///
/// Returns `RuleError::Deserialization` naming the first bad node, for an unknown
/// `node_type`, a wrong `value`, children that do not fit the node type, or a
/// comparison the catalog rejects.
pub fn deserialize(canonical: &CanonicalNode, catalog: &Catalog) -> RuleResult<Node> {
    decode_node(canonical, catalog, "root")
}

fn decode_node(canonical: &CanonicalNode, catalog: &Catalog, path: &str) -> RuleResult<Node> {
    match canonical.node_type.as_str() {
        OPERAND => {
            if canonical.left.is_some() || canonical.right.is_some() {
                return Err(RuleError::deserialization(
                    path,
                    "operand nodes must not have children",
                ));
            }
            let (attribute, comparator, literal) = decode_triple(&canonical.value, path)?;
            let comparison = validator::checked_comparison(catalog, attribute, comparator, literal)
                .map_err(|e| RuleError::deserialization(path, e.to_string()))?;
            Ok(Node::operand(comparison))
        }
        OPERATOR => {
            let logic = match canonical.value.as_str() {
                Some("AND") => Logic::And,
                Some("OR") => Logic::Or,
                _ => {
                    return Err(RuleError::deserialization(
                        path,
                        format!("operator value must be \"AND\" or \"OR\", found {}", canonical.value),
                    ))
                }
            };
            let (Some(left), Some(right)) = (&canonical.left, &canonical.right) else {
                return Err(RuleError::deserialization(
                    path,
                    "operator nodes must have both children",
                ));
            };
            let left = decode_node(left, catalog, &format!("{}.left", path))?;
            let right = decode_node(right, catalog, &format!("{}.right", path))?;
            Ok(Node::operator(logic, left, right))
        }
        other => Err(RuleError::deserialization(
            path,
            format!("unknown node_type '{}'", other),
        )),
    }
}

fn decode_triple<'a>(value: &'a Json, path: &str) -> RuleResult<(&'a str, Comparator, Value)> {
    let invalid = |message: String| RuleError::deserialization(path, message);

    let items = match value.as_array() {
        Some(items) if items.len() == 3 => items,
        _ => {
            return Err(invalid(format!(
                "operand value must be an [attribute, comparator, literal] triple, found {}",
                value
            )))
        }
    };

    let attribute = items[0]
        .as_str()
        .ok_or_else(|| invalid(format!("attribute must be a string, found {}", items[0])))?;
    let comparator = items[1]
        .as_str()
        .ok_or_else(|| invalid(format!("comparator must be a string, found {}", items[1])))?
        .parse::<Comparator>()
        .map_err(invalid)?;
    let literal = match &items[2] {
        Json::String(s) => Value::Text(s.clone()),
        Json::Number(n) => match n.as_f64() {
            Some(n) => Value::Number(n),
            None => return Err(invalid(format!("literal {} is not representable", n))),
        },
        other => {
            return Err(invalid(format!(
                "literal must be a number or a string, found {}",
                other
            )))
        }
    };

    Ok((attribute, comparator, literal))
}

fn literal_to_json(value: &Value) -> Json {
    match value {
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Text(s) => Json::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::RuleParser;
    use serde_json::json;

    fn parse(input: &str) -> Node {
        RuleParser::parse(input, &Catalog::default()).unwrap()
    }

    fn decode(json: Json) -> RuleResult<Node> {
        deserialize(&CanonicalNode::from_json_value(json)?, &Catalog::default())
    }

    #[test]
    fn test_serialize_operand() {
        let canonical = serialize(&parse("age > 30"));
        assert_eq!(
            serde_json::to_value(&canonical).unwrap(),
            json!({"node_type": "operand", "value": ["age", ">", 30.0], "left": null, "right": null})
        );
    }

    #[test]
    fn test_serialize_field_order() {
        let text = serde_json::to_string(&serialize(&parse("department = 'Sales'"))).unwrap();
        assert_eq!(
            text,
            r#"{"node_type":"operand","value":["department","=","Sales"],"left":null,"right":null}"#
        );
    }

    #[test]
    fn test_serialize_operator() {
        let canonical = serialize(&parse("age > 30 AND department = 'Sales'"));
        assert_eq!(canonical.node_type, "operator");
        assert_eq!(canonical.value, json!("AND"));
        assert_eq!(canonical.left.as_ref().unwrap().value, json!(["age", ">", 30.0]));
        assert_eq!(
            canonical.right.as_ref().unwrap().value,
            json!(["department", "=", "Sales"])
        );
    }

    #[test]
    fn test_round_trip() {
        for input in [
            "age > 30",
            "age > 30 AND department = 'Sales'",
            "(age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')",
            "salary >= 50000 OR experience != 5 AND age <= 60.5",
            "age > -3 AND (department != 'O\\'Brien' OR (salary < 1 OR salary > 2))",
        ] {
            let tree = parse(input);
            assert_eq!(deserialize(&serialize(&tree), &Catalog::default()), Ok(tree));
        }
    }

    #[test]
    fn test_round_trip_through_json_text() {
        let tree = parse("(age > 30 OR salary > 1000) AND department = 'Sales'");
        let text = serde_json::to_string(&serialize(&tree)).unwrap();
        let canonical = CanonicalNode::from_json_str(&text).unwrap();
        assert_eq!(deserialize(&canonical, &Catalog::default()), Ok(tree));
    }

    #[test]
    fn test_deep_combination_round_trip_through_json_text() {
        let rules: Vec<Node> = (0..500).map(|i| parse(&format!("age > {}", i))).collect();
        let tree = crate::expr::combine(rules).unwrap();
        assert_eq!(tree.depth(), 500);

        let text = serde_json::to_string(&serialize(&tree)).unwrap();
        let canonical = CanonicalNode::from_json_str(&text).unwrap();
        assert_eq!(deserialize(&canonical, &Catalog::default()), Ok(tree));
    }

    #[test]
    fn test_from_json_text_rejects_trailing_characters() {
        let text = r#"{"node_type": "operand", "value": ["age", ">", 1], "left": null, "right": null} x"#;
        assert!(from_json_text::<CanonicalNode>(text).is_err());
    }

    #[test]
    fn test_accepts_integer_literals() {
        let tree = decode(json!({"node_type": "operand", "value": ["age", ">", 30], "left": null, "right": null}));
        assert_eq!(tree, Ok(parse("age > 30")));
    }

    #[test]
    fn test_missing_children_keys_read_as_null() {
        let tree = decode(json!({"node_type": "operand", "value": ["age", ">", 30]}));
        assert_eq!(tree, Ok(parse("age > 30")));
    }

    #[test]
    fn test_unknown_node_type() {
        let err = decode(json!({"node_type": "negation", "value": "NOT", "left": null, "right": null}))
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::deserialization("root", "unknown node_type 'negation'")
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = decode(json!({"node_type": "operand", "value": ["age", ">", 30], "left": null, "right": null, "extra": 1}))
            .unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { ref path, .. } if path == "root"));
    }

    #[test]
    fn test_operand_with_children() {
        let leaf = json!({"node_type": "operand", "value": ["age", ">", 30], "left": null, "right": null});
        let err = decode(json!({"node_type": "operand", "value": ["age", ">", 30], "left": leaf, "right": null}))
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::deserialization("root", "operand nodes must not have children")
        );
    }

    #[test]
    fn test_operator_missing_child() {
        let leaf = json!({"node_type": "operand", "value": ["age", ">", 30], "left": null, "right": null});
        let err = decode(json!({"node_type": "operator", "value": "AND", "left": leaf, "right": null}))
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::deserialization("root", "operator nodes must have both children")
        );
    }

    #[test]
    fn test_operator_bad_value() {
        let leaf = json!({"node_type": "operand", "value": ["age", ">", 30], "left": null, "right": null});
        let err = decode(json!({"node_type": "operator", "value": "XOR", "left": leaf, "right": leaf}))
            .unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { ref path, .. } if path == "root"));
    }

    #[test]
    fn test_bad_triple_shape() {
        let err = decode(json!({"node_type": "operand", "value": ["age", ">"], "left": null, "right": null}))
            .unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { .. }));

        let err = decode(json!({"node_type": "operand", "value": ["age", "~", 3], "left": null, "right": null}))
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::deserialization("root", "unknown comparator '~'")
        );

        let err = decode(json!({"node_type": "operand", "value": ["age", ">", true], "left": null, "right": null}))
            .unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { .. }));
    }

    #[test]
    fn test_revalidation_failure_names_path() {
        let good = json!({"node_type": "operand", "value": ["age", ">", 30], "left": null, "right": null});
        let stale = json!({"node_type": "operand", "value": ["bonus", ">", 5], "left": null, "right": null});
        let err = decode(json!({"node_type": "operator", "value": "OR", "left": good, "right": stale}))
            .unwrap_err();
        match err {
            RuleError::Deserialization { path, message } => {
                assert_eq!(path, "root.right");
                assert!(message.contains("unknown attribute 'bonus'"), "{}", message);
            }
            other => panic!("expected deserialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_revalidation_against_different_catalog() {
        let canonical = serialize(&parse("department = 'Sales'"));
        let catalog = Catalog::empty().with_attribute("department", crate::catalog::ValueKind::Numeric);
        let err = deserialize(&canonical, &catalog).unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { ref message, .. } if message.contains("type mismatch")));
    }

    #[test]
    fn test_revalidation_rejects_ordering_on_text() {
        let err = decode(json!({"node_type": "operand", "value": ["department", ">", "A"], "left": null, "right": null}))
            .unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { ref message, .. } if message.contains("not valid")));
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let err = CanonicalNode::from_json_str("not json").unwrap_err();
        assert!(matches!(err, RuleError::Deserialization { .. }));
    }
}
