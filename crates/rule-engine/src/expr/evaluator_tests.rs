//! Tests for rule evaluation.

use super::*;
use crate::catalog::{Catalog, ValueKind};

// ==================== Test Helpers ====================

fn rule(input: &str) -> Node {
    RuleParser::parse(input, &Catalog::default()).unwrap()
}

fn record(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn employee(age: f64, department: &str, salary: f64, experience: f64) -> Record {
    record(&[
        ("age", Value::Number(age)),
        ("department", Value::from(department)),
        ("salary", Value::Number(salary)),
        ("experience", Value::Number(experience)),
    ])
}

fn eval(input: &str, data: &Record) -> RuleResult<bool> {
    evaluate(&rule(input), data)
}

const CLASSIC: &str = "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) \
                       AND (salary > 50000 OR experience > 5)";

// ==================== Comparison Tests ====================

#[test]
fn test_numeric_comparators() {
    let data = record(&[("age", Value::Number(30.0))]);

    assert!(!eval("age > 30", &data).unwrap());
    assert!(eval("age > 29.5", &data).unwrap());
    assert!(!eval("age < 30", &data).unwrap());
    assert!(eval("age < 31", &data).unwrap());
    assert!(eval("age = 30", &data).unwrap());
    assert!(eval("age >= 30", &data).unwrap());
    assert!(eval("age <= 30", &data).unwrap());
    assert!(!eval("age != 30", &data).unwrap());
    assert!(eval("age != 31", &data).unwrap());
}

#[test]
fn test_integer_and_decimal_compare_equal() {
    let data: Record = serde_json::from_str(r#"{"age": 30}"#).unwrap();
    assert!(eval("age = 30.0", &data).unwrap());
}

#[test]
fn test_negative_numbers() {
    let data = record(&[("experience", Value::Number(-2.0))]);
    assert!(eval("experience < 0", &data).unwrap());
    assert!(eval("experience > -3", &data).unwrap());
}

#[test]
fn test_text_comparators() {
    let data = record(&[("department", Value::from("Sales"))]);

    assert!(eval("department = 'Sales'", &data).unwrap());
    assert!(!eval("department = 'Marketing'", &data).unwrap());
    assert!(eval("department != 'Marketing'", &data).unwrap());
    assert!(!eval("department != 'Sales'", &data).unwrap());
}

#[test]
fn test_text_equality_is_exact() {
    let data = record(&[("department", Value::from("Sales"))]);
    assert!(!eval("department = 'sales'", &data).unwrap());
    assert!(!eval("department = 'Sales '", &data).unwrap());
}

// ==================== Boolean Operator Tests ====================

#[test]
fn test_and_requires_both() {
    let data = employee(35.0, "Sales", 0.0, 0.0);
    assert!(eval("age > 30 AND department = 'Sales'", &data).unwrap());
    assert!(!eval("age > 40 AND department = 'Sales'", &data).unwrap());
    assert!(!eval("age > 30 AND department = 'HR'", &data).unwrap());
}

#[test]
fn test_or_requires_either() {
    let data = employee(35.0, "Sales", 0.0, 0.0);
    assert!(eval("age > 40 OR department = 'Sales'", &data).unwrap());
    assert!(eval("age > 30 OR department = 'HR'", &data).unwrap());
    assert!(!eval("age > 40 OR department = 'HR'", &data).unwrap());
}

#[test]
fn test_precedence_affects_result() {
    // age > 40 OR (department = 'Sales' AND salary > 100)
    let data = employee(35.0, "Sales", 50.0, 0.0);
    assert!(!eval("age > 40 OR department = 'Sales' AND salary > 100", &data).unwrap());
    // (age > 30 OR department = 'HR') AND salary > 10
    assert!(eval("(age > 30 OR department = 'HR') AND salary > 10", &data).unwrap());
}

#[test]
fn test_classic_rule() {
    let tree = rule(CLASSIC);
    let evaluator = RuleEvaluator::new(&tree);

    assert!(evaluator.matches(&employee(35.0, "Sales", 60000.0, 3.0)).unwrap());
    assert!(evaluator.matches(&employee(22.0, "Marketing", 20000.0, 6.0)).unwrap());
    assert!(!evaluator.matches(&employee(35.0, "Sales", 40000.0, 3.0)).unwrap());
    assert!(!evaluator.matches(&employee(28.0, "Sales", 90000.0, 10.0)).unwrap());
    assert!(!evaluator.matches(&employee(22.0, "Sales", 90000.0, 10.0)).unwrap());
}

// ==================== Short-Circuit Tests ====================

#[test]
fn test_and_short_circuits_on_false() {
    let data = record(&[("age", Value::Number(20.0))]);
    // salary is never looked at
    assert!(!eval("age > 30 AND salary > 50000", &data).unwrap());
}

#[test]
fn test_or_short_circuits_on_true() {
    let data = record(&[("age", Value::Number(35.0))]);
    assert!(eval("age > 30 OR salary > 50000", &data).unwrap());
}

#[test]
fn test_short_circuit_skips_type_errors() {
    let data = record(&[("age", Value::Number(35.0)), ("salary", Value::from("lots"))]);
    assert!(eval("age > 30 OR salary > 50000", &data).unwrap());
}

#[test]
fn test_right_side_evaluated_when_needed() {
    let data = record(&[("age", Value::Number(35.0))]);
    assert_eq!(
        eval("age > 30 AND salary > 50000", &data),
        Err(RuleError::missing_attribute("salary"))
    );
    assert_eq!(
        eval("age < 30 OR salary > 50000", &data),
        Err(RuleError::missing_attribute("salary"))
    );
}

// ==================== Error Tests ====================

#[test]
fn test_missing_attribute() {
    let err = eval("age > 30", &Record::new()).unwrap_err();
    assert_eq!(err, RuleError::missing_attribute("age"));
    assert_eq!(err.kind(), ErrorKind::MissingAttribute);
    assert_eq!(err.to_string(), "record is missing attribute 'age'");
}

#[test]
fn test_record_value_of_wrong_kind() {
    let data = record(&[("age", Value::from("thirty"))]);
    assert_eq!(
        eval("age > 30", &data),
        Err(RuleError::TypeMismatch {
            attribute: "age".to_string(),
            expected: ValueKind::Numeric,
            found: ValueKind::Text,
            position: None,
        })
    );

    let data = record(&[("department", Value::Number(7.0))]);
    assert_eq!(
        eval("department = 'Sales'", &data),
        Err(RuleError::TypeMismatch {
            attribute: "department".to_string(),
            expected: ValueKind::Text,
            found: ValueKind::Numeric,
            position: None,
        })
    );
}

#[test]
fn test_extra_record_fields_are_ignored() {
    let data = record(&[
        ("age", Value::Number(35.0)),
        ("nickname", Value::from("Ace")),
    ]);
    assert!(eval("age > 30", &data).unwrap());
}

// ==================== Evaluator Tests ====================

#[test]
fn test_evaluation_is_repeatable() {
    let tree = rule(CLASSIC);
    let data = employee(35.0, "Sales", 60000.0, 3.0);
    let first = evaluate(&tree, &data);
    for _ in 0..5 {
        assert_eq!(evaluate(&tree, &data), first);
    }
}

#[test]
fn test_filter_records_keeps_order() {
    let tree = rule("department = 'Sales' AND age > 30");
    let records = vec![
        employee(35.0, "Sales", 0.0, 0.0),
        employee(45.0, "HR", 0.0, 0.0),
        employee(25.0, "Sales", 0.0, 0.0),
        employee(50.0, "Sales", 0.0, 0.0),
    ];

    let matched = RuleEvaluator::new(&tree).filter_records(&records).unwrap();
    assert_eq!(matched.len(), 2);
    assert!(std::ptr::eq(matched[0], &records[0]));
    assert!(std::ptr::eq(matched[1], &records[3]));
}

#[test]
fn test_filter_records_stops_at_first_error() {
    let tree = rule("age > 30");
    let records = vec![
        record(&[("age", Value::Number(35.0))]),
        Record::new(),
        record(&[("age", Value::Number(40.0))]),
    ];

    assert_eq!(
        RuleEvaluator::new(&tree).filter_records(&records),
        Err(RuleError::missing_attribute("age"))
    );
}

#[test]
fn test_evaluator_shared_across_threads() {
    let tree = rule(CLASSIC);
    let evaluator = RuleEvaluator::new(&tree);

    std::thread::scope(|s| {
        for age in [22.0, 35.0] {
            s.spawn(move || {
                let department = if age < 25.0 { "Marketing" } else { "Sales" };
                assert!(evaluator
                    .matches(&employee(age, department, 60000.0, 10.0))
                    .unwrap());
            });
        }
    });
}
