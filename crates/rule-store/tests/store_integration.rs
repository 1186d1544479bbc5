//! Integration tests for RuleStore.
//!
//! These tests verify that rules saved through the store come back as the same
//! trees once decoded by the engine.

use std::fs;

use rule_engine_rs::prelude::*;
use rule_store_rs::{RuleStore, StoreError, DOCUMENT_VERSION};
use tempfile::tempdir;

#[test]
fn test_save_and_restore_parsed_rule() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = RuleStore::with_path(temp_dir.path().join("rules.json"));
    let engine = RuleEngine::default();

    let text = "(age > 30 AND department = 'Sales') OR salary >= 50000";
    let rule = engine.parse(text).unwrap();
    store.save(text, engine.serialize(&rule)).unwrap();

    let stored = store.load_all().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].rule_text, text);
    assert_eq!(engine.deserialize(&stored[0].ast).unwrap(), rule);
}

#[test]
fn test_combined_rule_is_stored_under_name() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = RuleStore::with_path(temp_dir.path().join("rules.json"));
    let engine = RuleEngine::default();

    let texts = ["age > 30", "department = 'Sales'"];
    let combined = engine.parse_and_combine(texts).unwrap().unwrap();
    let combined_text = combined.to_string();
    store
        .save_named("combined_rule", &combined_text, engine.serialize(&combined))
        .unwrap();

    let stored = store.load_all().unwrap();
    assert_eq!(stored[0].name.as_deref(), Some("combined_rule"));
    assert_eq!(stored[0].rule_text, "age > 30 AND department = 'Sales'");
    assert_eq!(engine.deserialize(&stored[0].ast).unwrap(), combined);
}

#[test]
fn test_store_file_layout() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("rules.json");
    let store = RuleStore::with_path(path.clone());
    let engine = RuleEngine::default();

    let rule = engine.parse("age > 30").unwrap();
    let record = store.save("age > 30", engine.serialize(&rule)).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains('\n'), "store file should be pretty-printed");

    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["version"], DOCUMENT_VERSION);
    assert_eq!(json["rules"][0]["id"], record.id.to_string());
    assert_eq!(json["rules"][0]["rule_text"], "age > 30");
    assert_eq!(json["rules"][0]["ast"]["node_type"], "operand");
    assert_eq!(json["rules"][0]["ast"]["value"][1], ">");
}

#[test]
fn test_load_invalid_json_returns_error() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("rules.json");
    fs::write(&path, "{ not json").unwrap();

    let store = RuleStore::with_path(path);
    let err = store.load_all().unwrap_err();
    assert!(matches!(err, StoreError::Json(_)), "unexpected error: {:?}", err);
}

#[test]
fn test_tampered_tree_is_caught_by_engine() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("rules.json");
    let store = RuleStore::with_path(path.clone());
    let engine = RuleEngine::default();

    let rule = engine.parse("department = 'Sales'").unwrap();
    store.save("department = 'Sales'", engine.serialize(&rule)).unwrap();

    // Swap the comparator for one that is illegal on text
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, contents.replacen("\"=\"", "\">\"", 1)).unwrap();

    let stored = store.load_all().unwrap();
    let err = engine.deserialize(&stored[0].ast).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Deserialization);
}

#[test]
fn test_save_overwrites_nothing() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = RuleStore::with_path(temp_dir.path().join("rules.json"));
    let engine = RuleEngine::default();

    for text in ["age > 1", "age > 2", "age > 3"] {
        let rule = engine.parse(text).unwrap();
        store.save(text, engine.serialize(&rule)).unwrap();
    }

    let texts: Vec<String> = store
        .load_all()
        .unwrap()
        .into_iter()
        .map(|r| r.rule_text)
        .collect();
    assert_eq!(texts, vec!["age > 1", "age > 2", "age > 3"]);
}

#[tokio::test]
async fn test_async_round_trip() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = RuleStore::with_path(temp_dir.path().join("rules.json"));
    let engine = RuleEngine::default();

    let rule = engine.parse("experience > 5 OR salary > 100").unwrap();
    let record = store
        .save_async("experience > 5 OR salary > 100", engine.serialize(&rule))
        .await
        .unwrap();

    let found = store.find_async(&record.id).await.unwrap().unwrap();
    assert_eq!(engine.deserialize(&found.ast).unwrap(), rule);

    store.clear_async().await.unwrap();
    assert!(store.load_all_async().await.unwrap().is_empty());
}

#[test]
fn test_deeply_combined_rule_keeps_store_readable() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = RuleStore::with_path(temp_dir.path().join("rules.json"));
    let engine = RuleEngine::default();

    let texts: Vec<String> = (0..500).map(|i| format!("age > {}", i)).collect();
    let combined = engine.parse_and_combine(&texts).unwrap().unwrap();
    store
        .save_named("combined_rule", &combined.to_string(), engine.serialize(&combined))
        .unwrap();

    // Appending reads the whole document back first
    let rule = engine.parse("salary > 10").unwrap();
    store.save("salary > 10", engine.serialize(&rule)).unwrap();

    let stored = store.load_all().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(engine.deserialize(&stored[0].ast).unwrap(), combined);
    assert_eq!(engine.deserialize(&stored[1].ast).unwrap(), rule);

    let canonical_json = serde_json::to_string(&stored[0].ast).unwrap();
    assert_eq!(engine.deserialize_json(&canonical_json).unwrap(), combined);
}
