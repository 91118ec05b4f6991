//! Shared setup for the structural suite.

use inventory::inventory::test_harness::{Mismatch, SharedTestDb, TestDb};
use std::sync::Arc;

/// Acquire the shared test database, or skip the calling test.
///
/// Returns `None` (after printing why) when `SKIP_DOCKER_TESTS` is set or no
/// Docker daemon is reachable; any other provisioning failure is a real
/// error and panics.
pub async fn shared_db() -> Option<Arc<TestDb>> {
    let _ = env_logger::builder().is_test(true).try_init();

    if std::env::var("SKIP_DOCKER_TESTS").is_ok() {
        println!("Skipping Docker test (SKIP_DOCKER_TESTS is set)");
        return None;
    }

    match SharedTestDb::acquire().await {
        Ok(db) => Some(db),
        Err(e) => {
            let message = e.to_string();
            if message.contains("docker") || message.contains("Docker") {
                println!("Skipping test - Docker not available: {}", e);
                None
            } else {
                panic!("failed to provision test database: {}", e);
            }
        }
    }
}

/// Fail with one line per finding so a mismatch is diagnosable from the
/// test output alone.
pub fn assert_no_findings(findings: &[Mismatch]) {
    assert!(
        findings.is_empty(),
        "schema findings:\n{}",
        findings
            .iter()
            .map(|m| format!("  - {}\n", m))
            .collect::<String>()
    );
}
