//! Structural tests for attributes, product_type, and attribute_value.

use crate::harness::{assert_no_findings, shared_db};
use inventory::inventory::test_harness::{contracts, SchemaValidator};

#[tokio::test]
async fn test_attributes_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::attributes())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}

#[tokio::test]
async fn test_product_type_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::product_type())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}

#[tokio::test]
async fn test_product_type_self_foreign_key() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_foreign_keys(&contracts::product_type())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_attribute_value_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::attribute_value())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}
