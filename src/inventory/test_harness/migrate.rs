//! Migration applier
//!
//! Drives sqlx's migration runner against the caller-supplied pool so the
//! exact session used for setup is the one that gets migrated and inspected.
//! Revision ordering is owned entirely by the tool's recorded migration list
//! (the version prefixes of the files under the script location); it is not
//! reimplemented here.
//!
//! Applying `Revision::Head` twice in a row is a no-op the second time: the
//! tool's applied-migrations ledger skips revisions it has already run.

use super::error::{HarnessError, HarnessResult};
use sqlx::migrate::{Migration, Migrator};
use sqlx::PgPool;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Target revision for an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// All recorded revisions, oldest to newest
    Head,
    /// Up to and including a specific recorded version
    Version(i64),
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Head => write!(f, "head"),
            Revision::Version(v) => write!(f, "{}", v),
        }
    }
}

/// Applies versioned schema migrations from a script directory.
#[derive(Debug)]
pub struct MigrationRunner {
    migrator: Migrator,
    location: PathBuf,
}

impl MigrationRunner {
    /// Load the migration set recorded under `script_location`.
    pub async fn from_dir(script_location: impl AsRef<Path>) -> HarnessResult<Self> {
        let location = script_location.as_ref().to_path_buf();
        let migrator =
            Migrator::new(location.as_path())
                .await
                .map_err(|e| HarnessError::Migration {
                    message: format!(
                        "failed to load migrations from '{}'",
                        location.display()
                    ),
                    source: Some(e.to_string()),
                })?;
        Ok(Self { migrator, location })
    }

    /// Recorded revision versions, oldest to newest.
    pub fn revisions(&self) -> Vec<i64> {
        self.migrator.iter().map(|m| m.version).collect()
    }

    /// Bring the schema up to `revision`.
    ///
    /// Any migration error is fatal: a partially-migrated schema is not
    /// usable and the session must not proceed to validation.
    pub async fn upgrade(&self, pool: &PgPool, revision: Revision) -> HarnessResult<()> {
        log::info!(
            "Applying migrations from '{}' up to {}",
            self.location.display(),
            revision
        );
        match revision {
            Revision::Head => {
                self.migrator.run(pool).await?;
            }
            Revision::Version(version) => {
                let pinned = Migrator {
                    migrations: Cow::Owned(self.pinned_migrations(version)?),
                    ..Migrator::DEFAULT
                };
                pinned.run(pool).await?;
            }
        }
        log::info!("Migrations applied (target: {})", revision);
        Ok(())
    }

    /// The recorded list truncated at `version`, inclusive.
    fn pinned_migrations(&self, version: i64) -> HarnessResult<Vec<Migration>> {
        if !self.migrator.iter().any(|m| m.version == version) {
            return Err(HarnessError::Migration {
                message: format!(
                    "revision {} is not recorded under '{}'",
                    version,
                    self.location.display()
                ),
                source: None,
            });
        }
        Ok(self
            .migrator
            .iter()
            .filter(|m| m.version <= version)
            .cloned()
            .collect())
    }
}
