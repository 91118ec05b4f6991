//! # inventory
//!
//! A tutorial-grade inventory CRUD backend whose centerpiece is a structural
//! database test harness: it provisions a disposable PostgreSQL container,
//! waits for a verifiably stable running state, applies versioned schema
//! migrations, and validates the live schema against declarative per-entity
//! contracts.
//!
//! ## Layout
//!
//! - [`inventory::store`] — entity types and the persistence boundary
//!   (a trait with Postgres and in-memory implementations)
//! - [`inventory::test_harness`] — container lifecycle, readiness gate,
//!   migration runner, and the schema descriptor/validator engine
//!
//! ## Quick start (test setup)
//!
//! ```rust,no_run
//! use inventory::inventory::test_harness::{contracts, SchemaValidator, TestDb};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provision container -> wait for stability -> migrate to head
//!     let db = TestDb::provision().await?;
//!
//!     let validator = SchemaValidator::new(db.pool());
//!     let report = validator.validate(&contracts::category()).await?;
//!     report.assert_clean();
//!
//!     db.close().await?;
//!     Ok(())
//! }
//! ```

pub mod inventory;

// Re-export the harness entry points for convenience
pub use inventory::test_harness::{
    HarnessConfig, HarnessError, HarnessResult, SchemaExpectation, SchemaValidator, SharedTestDb,
    TestDb,
};
