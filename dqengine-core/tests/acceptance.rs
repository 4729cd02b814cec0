//! End-to-end checks of the engine against a small orders dataset.
//!
//! The fixture has one missing email, one extreme price and one repeated
//! order id; each built-in strategy should find exactly its own problem.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]

use dqengine_core::{
    BuiltinStrategy, Dataset, DqError, RuleSet, Severity, ValidationConfig, ValidationEngine,
};

const ORDERS: &str = r#"[
    {"id": 1, "email": "a@x.com", "price": 100,   "orderId": "A1"},
    {"id": 2, "email": "b@x.com", "price": 150,   "orderId": "A2"},
    {"id": 3, "email": "",        "price": 120,   "orderId": "A3"},
    {"id": 4, "email": "c@x.com", "price": 50000, "orderId": "A4"},
    {"id": 5, "email": "d@x.com", "price": 110,   "orderId": "A2"}
]"#;

fn orders() -> Dataset {
    Dataset::from_json_str(ORDERS).expect("fixture parses")
}

#[test]
fn test_completeness_finds_empty_email() {
    let result = ValidationEngine::new()
        .validate("completeness", &orders(), "email", None)
        .unwrap();

    assert!(!result.is_valid);
    assert_eq!(result.failed_row_indices, vec![2]);
    // 1 of 5 = 20%
    assert_eq!(result.severity, Severity::Critical);
}

#[test]
fn test_numerical_range_finds_price_outlier() {
    let result = ValidationEngine::new()
        .validate("numerical_range", &orders(), "price", Some(1.5))
        .unwrap();

    assert!(!result.is_valid);
    assert!(result.failed_row_indices.contains(&3));
    assert_eq!(result.failed_row_indices, vec![3]);
}

#[test]
fn test_uniqueness_finds_repeated_order_id() {
    let result = ValidationEngine::new()
        .validate("uniqueness", &orders(), "orderId", None)
        .unwrap();

    assert!(!result.is_valid);
    assert_eq!(result.failed_row_indices, vec![1, 4]);
    assert_eq!(result.severity, Severity::Critical);
}

#[test]
fn test_rule_set_document_end_to_end() {
    let rules = RuleSet::from_json_str(
        r#"{
            "format_version": "1.0",
            "dataset_name": "orders",
            "rules": [
                {"strategy_name": "completeness", "column": "email"},
                {"strategy_name": "numerical_range", "column": "price", "threshold": 1.5},
                {"strategy_name": "uniqueness", "column": "orderId"},
                {"strategy_name": "uniqueness", "column": "id"}
            ]
        }"#,
    )
    .unwrap();

    let report = ValidationEngine::new().run(&orders(), &rules).unwrap();

    assert_eq!(report.row_count, 5);
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.failed_count(), 3);
    assert_eq!(report.passed_count(), 1);
    assert!(report.outcomes[3].result.is_valid);
    assert_eq!(report.highest_severity(), Some(Severity::Critical));
}

#[test]
fn test_results_follow_config_order() {
    let engine = ValidationEngine::new();
    let forward = vec![
        ValidationConfig::new("uniqueness", "orderId"),
        ValidationConfig::new("completeness", "email"),
    ];
    let reversed: Vec<_> = forward.iter().rev().cloned().collect();

    let a = engine.validate_all(&orders(), &forward).unwrap();
    let b = engine.validate_all(&orders(), &reversed).unwrap();

    assert_eq!(a[0], b[1]);
    assert_eq!(a[1], b[0]);
}

#[test]
fn test_unknown_strategy_is_distinguishable() {
    let engine = ValidationEngine::new();

    let err = engine
        .validate("regex", &orders(), "email", None)
        .unwrap_err();
    assert!(matches!(err, DqError::UnknownStrategy { ref name, .. } if name == "regex"));
    assert!(err.to_string().contains("regex"));

    // a real strategy never errors, even on a missing column
    assert!(engine.validate("completeness", &orders(), "nope", None).is_ok());
}

#[test]
fn test_every_builtin_handles_empty_dataset() {
    let engine = ValidationEngine::new();
    let empty = Dataset::default();

    for builtin in BuiltinStrategy::ALL {
        let result = engine
            .validate(builtin.name(), &empty, "anything", None)
            .unwrap();
        assert!(
            result.failed_row_indices.is_empty(),
            "{} flagged rows in an empty dataset",
            builtin
        );
    }
}
