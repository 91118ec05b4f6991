//! Structural tests for the two join tables, each carrying two independent
//! foreign keys.

use crate::harness::{assert_no_findings, shared_db};
use inventory::inventory::test_harness::{contracts, SchemaValidator};

#[tokio::test]
async fn test_product_line_attribute_value_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::product_line_attribute_value())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}

#[tokio::test]
async fn test_product_product_type_both_foreign_keys() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_foreign_keys(&contracts::product_product_type())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_product_product_type_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::product_product_type())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}

/// Sweep every entity contract in one round.
#[tokio::test]
async fn test_every_entity_contract_holds() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    for contract in contracts::all() {
        let report = validator
            .validate(&contract)
            .await
            .expect("catalog query failed");
        report.assert_clean();
    }
}
