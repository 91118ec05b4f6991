//! Readiness and stability detection
//!
//! A container can report "running" transiently before crash-looping, so the
//! gate certifies readiness only after an unbroken run of stable
//! observations: every poll that sees `running` increments a counter, any
//! other status resets it to zero, and READY requires
//! `stable_count * poll_interval >= stable_window` before the deadline (equal
//! to the stability window, measured from the first poll) elapses.
//!
//! A timeout is reported to the caller as `Ok(false)`, never as success;
//! callers that need a hard guarantee escalate it to
//! `HarnessError::ReadinessTimeout` (see `session::TestDb`).

use super::docker::{ContainerHandle, ContainerRuntime, ContainerStatus};
use super::error::HarnessResult;
use std::time::Duration;
use tokio::time::Instant;

/// Source of status observations for one container.
///
/// Implemented for closures so unit tests can script status sequences, and by
/// [`RuntimeProbe`] for real containers.
pub trait StatusProbe {
    fn poll(&mut self) -> HarnessResult<ContainerStatus>;
}

impl<F> StatusProbe for F
where
    F: FnMut() -> HarnessResult<ContainerStatus>,
{
    fn poll(&mut self) -> HarnessResult<ContainerStatus> {
        self()
    }
}

/// Probe that asks the container runtime for a fresh status on every poll.
pub struct RuntimeProbe<'a, R: ContainerRuntime> {
    runtime: &'a R,
    handle: &'a ContainerHandle,
}

impl<'a, R: ContainerRuntime> RuntimeProbe<'a, R> {
    pub fn new(runtime: &'a R, handle: &'a ContainerHandle) -> Self {
        Self { runtime, handle }
    }
}

impl<R: ContainerRuntime> StatusProbe for RuntimeProbe<'_, R> {
    fn poll(&mut self) -> HarnessResult<ContainerStatus> {
        self.runtime.status(self.handle)
    }
}

/// Debounced stability detector for one container.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    stable_window: Duration,
    poll_interval: Duration,
}

impl ReadinessGate {
    /// `stable_window` is how long the container must stay continuously
    /// running; `poll_interval` is the sleep between status checks.
    pub fn new(stable_window: Duration, poll_interval: Duration) -> Self {
        assert!(
            !poll_interval.is_zero(),
            "poll_interval must be non-zero"
        );
        Self {
            stable_window,
            poll_interval,
        }
    }

    pub fn stable_window(&self) -> Duration {
        self.stable_window
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Wait for the first `running` observation, up to `startup_timeout`.
    ///
    /// Container start involves image pull and init-script replay, so the
    /// first `running` can lag well behind `docker run` returning. This
    /// bounded pre-wait runs before the stability window starts counting.
    pub async fn await_running(
        &self,
        probe: &mut impl StatusProbe,
        startup_timeout: Duration,
    ) -> HarnessResult<bool> {
        let started = Instant::now();
        loop {
            if probe.poll()?.is_running() {
                return Ok(true);
            }
            if started.elapsed() >= startup_timeout {
                log::warn!(
                    "Container did not report running within {:?}",
                    startup_timeout
                );
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Certify a continuously-stable running state.
    ///
    /// Returns `Ok(true)` once an unbroken run of `running` observations
    /// covers the stability window, `Ok(false)` if the deadline elapses
    /// first. Probe errors (daemon gone, container removed) propagate.
    pub async fn await_stable(&self, probe: &mut impl StatusProbe) -> HarnessResult<bool> {
        let required = required_observations(self.stable_window, self.poll_interval);
        let started = Instant::now();
        let mut stable_count: u32 = 0;

        while started.elapsed() < self.stable_window {
            let status = probe.poll()?;
            if status.is_running() {
                stable_count += 1;
            } else {
                log::debug!(
                    "Stability interrupted by status '{}', resetting counter",
                    status
                );
                stable_count = 0;
            }

            if stable_count >= required {
                log::info!(
                    "Container stable for {:?} ({} consecutive observations)",
                    self.stable_window,
                    stable_count
                );
                return Ok(true);
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        log::warn!(
            "Container failed to stabilize within {:?}",
            self.stable_window
        );
        Ok(false)
    }
}

/// Number of consecutive running observations that covers the window.
fn required_observations(stable_window: Duration, poll_interval: Duration) -> u32 {
    let window_ms = stable_window.as_millis().max(1);
    let interval_ms = poll_interval.as_millis().max(1);
    window_ms.div_ceil(interval_ms) as u32
}
