//! Structural tests for the product_line table.

use crate::harness::{assert_no_findings, shared_db};
use inventory::inventory::test_harness::{contracts, SchemaValidator};

/// price must introspect as decimal(5,2), precision and scale both checked.
#[tokio::test]
async fn test_product_line_columns_including_decimal_precision() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_columns(&contracts::product_line())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_product_line_constraints() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());

    let contract = contracts::product_line();
    let checks = validator
        .check_check_constraints(&contract)
        .await
        .expect("catalog query failed");
    assert_no_findings(&checks);

    let uniques = validator
        .check_unique_constraints(&contract)
        .await
        .expect("catalog query failed");
    assert_no_findings(&uniques);
}

#[tokio::test]
async fn test_product_line_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::product_line())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}
