//! Error types for the structural test harness
//!
//! Fatal setup failures (provisioning, readiness, migration, database access)
//! are modeled here. Schema mismatches are deliberately NOT an error variant:
//! they are the validator's normal output and are surfaced through the test
//! framework's assertion mechanism instead (see `validator::ValidationReport`).

use std::fmt;
use std::io;

/// Main error type for harness operations
#[derive(Debug, Clone)]
pub enum HarnessError {
    /// Container failed to start, or an existing one could not be removed
    Provision {
        message: String,
        source: Option<String>,
    },

    /// Stability was never certified within the deadline
    ReadinessTimeout { container: String, waited_ms: u64 },

    /// The migration tool errored while applying a revision
    Migration {
        message: String,
        source: Option<String>,
    },

    /// Connection or catalog-introspection failure (infrastructure, not
    /// schema shape)
    Database {
        message: String,
        source: Option<String>,
    },

    /// Configuration file or section error
    Config { message: String, path: String },

    /// IO error (file operations)
    Io { message: String, path: String },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Provision { message, source } => {
                if let Some(s) = source {
                    write!(f, "Provisioning error: {} ({})", message, s)
                } else {
                    write!(f, "Provisioning error: {}", message)
                }
            }
            HarnessError::ReadinessTimeout {
                container,
                waited_ms,
            } => {
                write!(
                    f,
                    "Container '{}' did not reach a stable running state within {}ms",
                    container, waited_ms
                )
            }
            HarnessError::Migration { message, source } => {
                if let Some(s) = source {
                    write!(f, "Migration error: {} ({})", message, s)
                } else {
                    write!(f, "Migration error: {}", message)
                }
            }
            HarnessError::Database { message, source } => {
                if let Some(s) = source {
                    write!(f, "Database error: {} ({})", message, s)
                } else {
                    write!(f, "Database error: {}", message)
                }
            }
            HarnessError::Config { message, path } => {
                if path.is_empty() {
                    write!(f, "Configuration error: {}", message)
                } else {
                    write!(f, "Configuration error in '{}': {}", path, message)
                }
            }
            HarnessError::Io { message, path } => {
                write!(f, "IO error for '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<io::Error> for HarnessError {
    fn from(err: io::Error) -> Self {
        HarnessError::Io {
            message: err.to_string(),
            path: String::new(),
        }
    }
}

impl From<serde_yaml::Error> for HarnessError {
    fn from(err: serde_yaml::Error) -> Self {
        HarnessError::Config {
            message: err.to_string(),
            path: String::new(),
        }
    }
}

impl From<sqlx::Error> for HarnessError {
    fn from(err: sqlx::Error) -> Self {
        HarnessError::Database {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<sqlx::migrate::MigrateError> for HarnessError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        HarnessError::Migration {
            message: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
