//! Structural tests for the category table.

use crate::harness::{assert_no_findings, shared_db};
use inventory::inventory::test_harness::{contracts, SchemaValidator};

#[tokio::test]
async fn test_category_table_exists() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    assert!(validator
        .table_exists("category")
        .await
        .expect("catalog query failed"));
}

#[tokio::test]
async fn test_category_column_types_nullability_and_defaults() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_columns(&contracts::category())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_category_check_constraints() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_check_constraints(&contracts::category())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_category_unique_constraints() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_unique_constraints(&contracts::category())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_category_self_foreign_key() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let findings = validator
        .check_foreign_keys(&contracts::category())
        .await
        .expect("catalog query failed");
    assert_no_findings(&findings);
}

#[tokio::test]
async fn test_category_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::category())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}

/// The validator must fail loudly, not silently, when the contract and the
/// live schema genuinely disagree.
#[tokio::test]
async fn test_category_detects_deliberate_contract_drift() {
    use inventory::inventory::test_harness::ColumnExpectation;

    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());

    // Claim slug is 100 wide when the live column is 120
    let drifted = contracts::category();
    let mut columns = drifted.columns.clone();
    for column in &mut columns {
        if column.name == "slug" {
            *column = ColumnExpectation::text("slug", 100);
        }
    }
    let drifted = inventory::inventory::test_harness::SchemaExpectation {
        columns,
        ..drifted
    };

    let findings = validator
        .check_columns(&drifted)
        .await
        .expect("catalog query failed");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].element, "slug");
    assert!(findings[0].detail.contains("text(100)"));
}
