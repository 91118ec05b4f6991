//! Structural tests for the seasonal_events table.

use crate::harness::shared_db;
use inventory::inventory::test_harness::{contracts, SchemaValidator};

#[tokio::test]
async fn test_seasonal_events_full_contract() {
    let Some(db) = shared_db().await else { return };
    let validator = SchemaValidator::new(db.pool());
    let report = validator
        .validate(&contracts::seasonal_events())
        .await
        .expect("catalog query failed");
    report.assert_clean();
}
