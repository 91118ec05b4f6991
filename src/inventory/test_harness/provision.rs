//! Idempotent container provisioning
//!
//! Guarantees exactly one freshly-started container per name: any existing
//! container with the same name, in any state, is stopped and removed before
//! a new one is run. Stale state from a previous failed run can therefore
//! never leak into a session.
//!
//! This layer does not retry; backoff and stability detection belong to the
//! readiness gate.

use super::docker::{ContainerHandle, ContainerRuntime, ContainerSpec};
use super::error::HarnessResult;

/// Provisions named containers through a [`ContainerRuntime`].
pub struct Orchestrator<'a, R: ContainerRuntime> {
    runtime: &'a R,
}

impl<'a, R: ContainerRuntime> Orchestrator<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Ensure a single freshly-started container exists for `spec.name`.
    ///
    /// Fails fast with a provisioning error if the image cannot be started or
    /// the port/network configuration conflicts with an existing resource.
    /// The caller owns eventual teardown (see `session::TestDb`).
    pub fn provision(&self, spec: &ContainerSpec) -> HarnessResult<ContainerHandle> {
        if let Some(existing) = self.runtime.find(&spec.name)? {
            log::info!(
                "Container '{}' exists ({}), stopping and removing",
                spec.name,
                existing.short_id()
            );
            self.runtime.stop(&existing)?;
            self.runtime.remove(&existing)?;
            log::info!("Container '{}' stopped and removed", spec.name);
        } else {
            log::debug!("No existing container named '{}'", spec.name);
        }

        let handle = self.runtime.run(spec)?;
        log::info!(
            "Started container '{}' ({}) from image {}",
            spec.name,
            handle.short_id(),
            spec.image
        );
        Ok(handle)
    }
}
