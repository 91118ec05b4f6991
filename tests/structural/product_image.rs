//! Structural tests for the product_image table.

use crate::harness::shared_db;
use inventory::inventory::test_harness::{contracts, SchemaValidator};

#[tokio::test]
async fn test_product_image_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::product_image())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}
