//! Test-session lifecycle
//!
//! [`TestDb`] is the scoped acquisition the whole harness funnels through:
//! provision container -> bounded wait for running -> stability barrier ->
//! connect (with retries while init scripts replay) -> migrate to head.
//! Release is guaranteed on every exit path: `close()` for the orderly case
//! and `Drop` as the backstop, so no orphaned container survives a test run.
//! Set `KEEP_TEST_DB=1` to keep the container around for a post-mortem.
//!
//! [`SharedTestDb`] lets concurrently-running tests inside one binary share a
//! single provisioned database; the last holder's drop releases the
//! container.

use super::config::HarnessConfig;
use super::docker::{ContainerHandle, ContainerRuntime, DockerCli};
use super::error::{HarnessError, HarnessResult};
use super::migrate::{MigrationRunner, Revision};
use super::provision::Orchestrator;
use super::readiness::RuntimeProbe;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// Environment variable that disables container teardown.
const KEEP_ENV: &str = "KEEP_TEST_DB";

/// A provisioned, migrated, ready-to-validate test database.
pub struct TestDb {
    docker: DockerCli,
    handle: Option<ContainerHandle>,
    pool: PgPool,
    config: HarnessConfig,
}

impl TestDb {
    /// Provision with the default profile.
    pub async fn provision() -> HarnessResult<Self> {
        Self::provision_with(HarnessConfig::default()).await
    }

    /// Provision with an explicit profile.
    ///
    /// Fatal failures at any stage tear the container down before returning,
    /// so a failed setup leaves nothing behind.
    pub async fn provision_with(config: HarnessConfig) -> HarnessResult<Self> {
        let docker = DockerCli::new();
        let spec = config.container_spec()?;

        let handle = Orchestrator::new(&docker).provision(&spec)?;

        match Self::finish_setup(&docker, &handle, &config).await {
            Ok(pool) => Ok(Self {
                docker,
                handle: Some(handle),
                pool,
                config,
            }),
            Err(e) => {
                release_container(&docker, &handle);
                Err(e)
            }
        }
    }

    /// Readiness barrier, connection, and migration. Split out so the caller
    /// can tear down the container on any error.
    async fn finish_setup(
        docker: &DockerCli,
        handle: &ContainerHandle,
        config: &HarnessConfig,
    ) -> HarnessResult<PgPool> {
        let started = Instant::now();
        let gate = config.readiness_gate();
        let mut probe = RuntimeProbe::new(docker, handle);

        let running = gate
            .await_running(&mut probe, config.readiness.startup_timeout())
            .await?;
        let stable = running && gate.await_stable(&mut probe).await?;
        if !stable {
            // A timeout is never treated as ready; escalate
            return Err(HarnessError::ReadinessTimeout {
                container: handle.name.clone(),
                waited_ms: started.elapsed().as_millis() as u64,
            });
        }

        let pool = Self::connect(config).await?;

        let runner = MigrationRunner::from_dir(&config.migrations.path).await?;
        runner.upgrade(&pool, Revision::Head).await?;

        log::info!(
            "Test database ready in {:?} (container '{}')",
            started.elapsed(),
            handle.name
        );
        Ok(pool)
    }

    /// Connect to the database, retrying within the configured window.
    ///
    /// The container is stable before this runs, but the server inside may
    /// still be replaying init scripts, and the target database is created by
    /// one of them.
    async fn connect(config: &HarnessConfig) -> HarnessResult<PgPool> {
        let url = config.database.url();
        let deadline = Instant::now() + config.database.connect_timeout();

        loop {
            match PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(5))
                .connect(&url)
                .await
            {
                Ok(pool) => {
                    log::info!("Connected to {}", config.database.dbname);
                    return Ok(pool);
                }
                Err(e) if Instant::now() < deadline => {
                    log::debug!("Database not accepting connections yet: {}", e);
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
                Err(e) => {
                    return Err(HarnessError::Database {
                        message: format!(
                            "could not connect to '{}' within {:?}",
                            config.database.dbname,
                            config.database.connect_timeout()
                        ),
                        source: Some(e.to_string()),
                    });
                }
            }
        }
    }

    /// Connection pool for the provisioned database.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The profile this session was provisioned with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Handle of the backing container, while it is still owned.
    pub fn container(&self) -> Option<&ContainerHandle> {
        self.handle.as_ref()
    }

    /// Orderly release: close the pool, then stop and remove the container.
    pub async fn close(mut self) -> HarnessResult<()> {
        self.pool.close().await;
        if let Some(handle) = self.handle.take() {
            if keep_container() {
                log::info!("{} set, keeping container '{}'", KEEP_ENV, handle.name);
                return Ok(());
            }
            self.docker.stop(&handle)?;
            self.docker.remove(&handle)?;
            log::info!("Container '{}' stopped and removed", handle.name);
        }
        Ok(())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            release_container(&self.docker, &handle);
        }
    }
}

fn keep_container() -> bool {
    std::env::var(KEEP_ENV).map(|v| v == "1").unwrap_or(false)
}

/// Best-effort stop+remove for error paths and Drop.
fn release_container(docker: &DockerCli, handle: &ContainerHandle) {
    if keep_container() {
        log::info!("{} set, keeping container '{}'", KEEP_ENV, handle.name);
        return;
    }
    if let Err(e) = docker.stop(handle) {
        log::warn!("Failed to stop container '{}': {}", handle.name, e);
    }
    if let Err(e) = docker.remove(handle) {
        log::warn!("Failed to remove container '{}': {}", handle.name, e);
    }
}

// ============================================================================
// Shared session
// ============================================================================

static SHARED_SLOT: tokio::sync::Mutex<Weak<TestDb>> =
    tokio::sync::Mutex::const_new(Weak::new());

/// Process-wide shared test database.
///
/// Tests that overlap in time share one provisioned container; once every
/// holder has dropped its `Arc`, the container is released, and a later
/// acquire provisions a fresh one. This replaces a module-level singleton
/// session: acquisition is explicit and release is tied to scope.
pub struct SharedTestDb;

impl SharedTestDb {
    /// Get the shared database, provisioning it if no live session exists.
    pub async fn acquire() -> HarnessResult<Arc<TestDb>> {
        let mut slot = SHARED_SLOT.lock().await;
        if let Some(db) = slot.upgrade() {
            log::debug!("Reusing shared test database");
            return Ok(db);
        }
        log::info!("Provisioning shared test database");
        let db = Arc::new(TestDb::provision().await?);
        *slot = Arc::downgrade(&db);
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_container_reads_env() {
        // Only the exact value "1" opts out of teardown
        std::env::remove_var(KEEP_ENV);
        assert!(!keep_container());
        std::env::set_var(KEEP_ENV, "0");
        assert!(!keep_container());
        std::env::set_var(KEEP_ENV, "1");
        assert!(keep_container());
        std::env::remove_var(KEEP_ENV);
    }
}
