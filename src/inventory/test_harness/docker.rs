//! Container runtime client
//!
//! A thin wrapper over the Docker CLI: list/get/run/stop/remove containers by
//! name and query container status via inspect. The orchestrator and the
//! readiness gate talk to the runtime exclusively through the
//! [`ContainerRuntime`] trait, so tests can substitute a scripted double
//! without touching a Docker daemon.

use super::error::{HarnessError, HarnessResult};
use std::path::PathBuf;
use std::process::{Command, Output};

// ============================================================================
// Container Status
// ============================================================================

/// Lifecycle state of a container as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    /// Created but never started
    Created,
    /// Currently running
    Running,
    /// Stopped (cleanly or by crash)
    Exited,
    /// No longer known to the runtime
    Removed,
    /// Any state this client does not track (paused, restarting, ...)
    Unknown,
}

impl ContainerStatus {
    /// Parse a status string from `docker inspect -f '{{.State.Status}}'`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "created" => ContainerStatus::Created,
            "running" => ContainerStatus::Running,
            "exited" | "dead" => ContainerStatus::Exited,
            _ => ContainerStatus::Unknown,
        }
    }

    /// Returns true only for an observed running state.
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerStatus::Running)
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContainerStatus::Created => "created",
            ContainerStatus::Running => "running",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Removed => "removed",
            ContainerStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Container Spec
// ============================================================================

/// A host-to-container port mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

/// A bind mount from a host path into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host_path: PathBuf,
    pub container_path: String,
}

/// Everything needed to run one named container.
///
/// Built once with the builder methods below and submitted to the
/// orchestrator; not mutated afterwards.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub ports: Vec<PortMapping>,
    pub env: Vec<(String, String)>,
    pub volumes: Vec<VolumeMount>,
    pub network: Option<String>,
}

impl ContainerSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ports: Vec::new(),
            env: Vec::new(),
            volumes: Vec::new(),
            network: None,
        }
    }

    /// Publish a container port on a host port.
    pub fn with_port(mut self, host: u16, container: u16) -> Self {
        self.ports.push(PortMapping { host, container });
        self
    }

    /// Set an environment variable inside the container.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Bind-mount a host directory into the container.
    pub fn with_volume(mut self, host_path: impl Into<PathBuf>, container_path: impl Into<String>) -> Self {
        self.volumes.push(VolumeMount {
            host_path: host_path.into(),
            container_path: container_path.into(),
        });
        self
    }

    /// Attach the container to a named network.
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }
}

/// Runtime identity of a provisioned container.
///
/// The id is opaque; status is always queried through the runtime client
/// rather than cached here, since it can change at any moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
}

impl ContainerHandle {
    /// Short id for log lines, docker-style.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(12)]
    }
}

// ============================================================================
// Runtime boundary
// ============================================================================

/// The container-runtime boundary.
///
/// [`DockerCli`] is the production implementation; unit tests implement this
/// directly with an in-memory double.
pub trait ContainerRuntime {
    /// Find a container by exact name, in any state.
    fn find(&self, name: &str) -> HarnessResult<Option<ContainerHandle>>;

    /// Create and start a container from the spec, detached.
    fn run(&self, spec: &ContainerSpec) -> HarnessResult<ContainerHandle>;

    /// Fetch the current status from the runtime (never cached).
    fn status(&self, handle: &ContainerHandle) -> HarnessResult<ContainerStatus>;

    /// Stop a container. Stopping an already-stopped container is a no-op.
    fn stop(&self, handle: &ContainerHandle) -> HarnessResult<()>;

    /// Remove a stopped container.
    fn remove(&self, handle: &ContainerHandle) -> HarnessResult<()>;
}

// ============================================================================
// Docker CLI client
// ============================================================================

/// Docker client that shells out to the `docker` binary.
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    /// Use a non-default binary name (e.g. a podman shim).
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that the daemon answers at all.
    pub fn daemon_available(&self) -> bool {
        Command::new(&self.binary)
            .args(["version", "--format", "{{.Server.Version}}"])
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn exec(&self, args: &[&str]) -> HarnessResult<Output> {
        Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| HarnessError::Provision {
                message: format!("failed to invoke '{}'", self.binary),
                source: Some(e.to_string()),
            })
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one line of `docker ps --format '{{.ID}}\t{{.Names}}'` output.
fn parse_ps_line(line: &str) -> Option<ContainerHandle> {
    let mut parts = line.split('\t');
    let id = parts.next()?.trim();
    let name = parts.next()?.trim();
    if id.is_empty() || name.is_empty() {
        return None;
    }
    Some(ContainerHandle {
        id: id.to_string(),
        name: name.to_string(),
    })
}

impl ContainerRuntime for DockerCli {
    fn find(&self, name: &str) -> HarnessResult<Option<ContainerHandle>> {
        let filter = format!("name={}", name);
        let output = self.exec(&[
            "ps",
            "-a",
            "--filter",
            &filter,
            "--format",
            "{{.ID}}\t{{.Names}}",
        ])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::Provision {
                message: "docker ps failed".to_string(),
                source: Some(stderr.trim().to_string()),
            });
        }

        // The name filter matches substrings; require an exact name match.
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter_map(parse_ps_line)
            .find(|c| c.name == name))
    }

    fn run(&self, spec: &ContainerSpec) -> HarnessResult<ContainerHandle> {
        let mut args: Vec<String> = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            spec.name.clone(),
        ];
        for mapping in &spec.ports {
            args.push("-p".to_string());
            args.push(format!("{}:{}", mapping.host, mapping.container));
        }
        for (key, value) in &spec.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        for mount in &spec.volumes {
            args.push("-v".to_string());
            args.push(format!(
                "{}:{}",
                mount.host_path.display(),
                mount.container_path
            ));
        }
        if let Some(ref network) = spec.network {
            args.push("--network".to_string());
            args.push(network.clone());
        }
        args.push(spec.image.clone());

        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let output = self.exec(&arg_refs)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::Provision {
                message: format!("failed to run container '{}'", spec.name),
                source: Some(stderr.trim().to_string()),
            });
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(HarnessError::Provision {
                message: format!("docker run returned no container id for '{}'", spec.name),
                source: None,
            });
        }

        Ok(ContainerHandle {
            id,
            name: spec.name.clone(),
        })
    }

    fn status(&self, handle: &ContainerHandle) -> HarnessResult<ContainerStatus> {
        let output = self.exec(&["inspect", "--format", "{{.State.Status}}", &handle.id])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("No such object") || stderr.contains("No such container") {
                return Ok(ContainerStatus::Removed);
            }
            return Err(HarnessError::Provision {
                message: format!("docker inspect failed for '{}'", handle.name),
                source: Some(stderr.trim().to_string()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(ContainerStatus::parse(&stdout))
    }

    fn stop(&self, handle: &ContainerHandle) -> HarnessResult<()> {
        let output = self.exec(&["stop", &handle.id])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::Provision {
                message: format!("failed to stop container '{}'", handle.name),
                source: Some(stderr.trim().to_string()),
            });
        }
        Ok(())
    }

    fn remove(&self, handle: &ContainerHandle) -> HarnessResult<()> {
        let output = self.exec(&["rm", &handle.id])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::Provision {
                message: format!("failed to remove container '{}'", handle.name),
                source: Some(stderr.trim().to_string()),
            });
        }
        Ok(())
    }
}
