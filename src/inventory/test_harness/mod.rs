//! Structural Database Test Harness
//!
//! Coordinates an external stateful process (a PostgreSQL server in a Docker
//! container) through setup and validation:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Harness Flow                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  1. Provision named container (remove any stale one first)      │
//! │  2. Wait for a debounced, continuously-stable running state     │
//! │  3. Connect and apply versioned migrations up to head           │
//! │  4. For each entity:                                            │
//! │     a. Introspect the live table from the catalog               │
//! │     b. Diff it against the declarative contract                 │
//! │     c. Report every violated expectation with full identity     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Setup failures (provisioning, readiness, migration) are fatal and abort
//! the session; schema mismatches are ordinary test failures carried by
//! [`validator::ValidationReport`].

pub mod config;
pub mod contracts;
pub mod docker;
pub mod error;
pub mod expectation;
pub mod inspector;
pub mod migrate;
pub mod provision;
pub mod readiness;
pub mod session;
pub mod validator;

// Re-export main types for convenience
pub use config::HarnessConfig;
pub use docker::{ContainerHandle, ContainerRuntime, ContainerSpec, ContainerStatus, DockerCli};
pub use error::{HarnessError, HarnessResult};
pub use expectation::{ColumnExpectation, ColumnType, ForeignKeyExpectation, SchemaExpectation};
pub use inspector::{SchemaInspector, TableSnapshot};
pub use migrate::{MigrationRunner, Revision};
pub use provision::Orchestrator;
pub use readiness::ReadinessGate;
pub use session::{SharedTestDb, TestDb};
pub use validator::{Mismatch, SchemaValidator, ValidationReport};
