//! Structural tests for the product table.
//!
//! Product carries two independent foreign keys; the tests here pin the
//! validator's per-key behavior against the live schema.

use crate::harness::{assert_no_findings, shared_db};
use inventory::inventory::test_harness::{contracts, SchemaExpectation, SchemaValidator};

#[tokio::test]
async fn test_product_table_exists() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    assert!(validator
        .table_exists("product")
        .await
        .expect("catalog query failed"));
}

#[tokio::test]
async fn test_product_column_types_nullability_and_defaults() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_columns(&contracts::product())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_product_check_constraints() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_check_constraints(&contracts::product())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_product_unique_constraints() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_unique_constraints(&contracts::product())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_product_both_foreign_keys_present() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_foreign_keys(&contracts::product())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

/// An expectation for a foreign key the schema does not have must fail even
/// though the table's real keys all exist; one satisfied key never covers
/// for another.
#[tokio::test]
async fn test_product_missing_foreign_key_is_reported_independently() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());

    let drifted = contracts::product().foreign_key(["name"], "category");
    let findings = validator
        .check_foreign_keys(&drifted)
        .await
        .expect("catalog query failed");

    assert_eq!(
        findings.len(),
        1,
        "only the fabricated key may fail: {:?}",
        findings
    );
    assert_eq!(findings[0].element, "(name) -> category");
}

#[tokio::test]
async fn test_product_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::product())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}

#[tokio::test]
async fn test_absent_table_yields_single_table_finding() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());

    let report = validator
        .validate(&SchemaExpectation::for_table("no_such_table"))
        .await
        .expect("catalog query failed");
    assert_eq!(report.findings.len(), 1);
    assert!(report.findings[0].detail.contains("does not exist"));
}
