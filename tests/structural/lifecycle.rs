//! Harness lifecycle tests: migration idempotence and live provisioning
//! idempotence.

use crate::harness::shared_db;
use inventory::inventory::test_harness::{
    ContainerRuntime, ContainerSpec, DockerCli, MigrationRunner, Orchestrator, Revision,
};

/// Re-applying head against an already-migrated database must be a no-op.
#[tokio::test]
async fn test_upgrade_to_head_is_idempotent() {
    let Some(db) = shared_db().await else { return };

    let runner = MigrationRunner::from_dir("migrations")
        .await
        .expect("migration scripts must load");

    // The shared database is already at head; these are the second and
    // third applications.
    runner
        .upgrade(db.pool(), Revision::Head)
        .await
        .expect("re-applying head must not error");
    runner
        .upgrade(db.pool(), Revision::Head)
        .await
        .expect("re-applying head must not error");
}

/// Provisioning the same name twice must leave exactly one container, and it
/// must be the fresh one.
#[test]
fn test_provision_same_name_twice_leaves_one_fresh_container() {
    if std::env::var("SKIP_DOCKER_TESTS").is_ok() {
        println!("Skipping Docker test (SKIP_DOCKER_TESTS is set)");
        return;
    }
    let docker = DockerCli::new();
    if !docker.daemon_available() {
        println!("Skipping test - Docker not available");
        return;
    }

    // Dedicated name so the shared session's container is untouched
    let spec = ContainerSpec::new("inventory-harness-selftest", "postgres:16.1-alpine3.19")
        .with_env("POSTGRES_USER", "postgres")
        .with_env("POSTGRES_PASSWORD", "postgres");

    let orchestrator = Orchestrator::new(&docker);
    let first = orchestrator.provision(&spec).expect("first provision");
    let second = orchestrator.provision(&spec).expect("second provision");

    assert_ne!(first.id, second.id, "second provision must replace the first");

    // docker ps reports short ids; docker run returns the full one
    let found = docker
        .find(&spec.name)
        .expect("docker ps")
        .expect("container must exist");
    assert!(second.id.starts_with(&found.id));

    docker.stop(&second).expect("cleanup stop");
    docker.remove(&second).expect("cleanup remove");
}
