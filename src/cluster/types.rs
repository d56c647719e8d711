// ABOUTME: Namespace-scoped resource descriptions exchanged with cluster clients.
// ABOUTME: Client-agnostic; the kube module converts these into API objects.

use crate::types::ServiceName;
use std::collections::BTreeMap;

/// Label carrying the owning stack's name. The pod watch selects on it.
pub const STACK_LABEL: &str = "stolos.stack";

/// Label carrying the service name within the stack.
pub const SERVICE_LABEL: &str = "stolos.service";

/// Marker label distinguishing stolos-managed resources.
pub const MANAGED_LABEL: &str = "stolos.managed";

/// A config map backed by one file-based source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMapSpec {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
}

/// A secret backed by one file-based source. Values are raw bytes; the
/// client encodes them as the store requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSpec {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub data: BTreeMap<String, Vec<u8>>,
}

/// The workload and network exposure backing one stack service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub image: String,
    pub replicas: u32,
    pub command: Option<Vec<String>>,
    pub env: BTreeMap<String, String>,
    pub ports: Vec<PortSpec>,
    pub config_mounts: Vec<MountSpec>,
    pub secret_mounts: Vec<MountSpec>,
}

/// One port of a service. A mapping without a published port is reachable
/// inside the cluster only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub published: Option<u16>,
    pub target: u16,
    pub protocol: Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

/// Where a config map or secret is surfaced inside the containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    /// Name of the config map or secret object.
    pub source: String,
    /// Absolute mount path inside the container.
    pub path: String,
}

/// A service already present in the target namespace, as reported by the
/// cluster. Ownership is judged from its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingService {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

/// One observed change in a pod's readiness, attributed to its service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodEvent {
    pub pod: String,
    pub service: ServiceName,
    pub readiness: PodReadiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodReadiness {
    /// Running and passing its readiness checks.
    Ready,
    /// Present but not (or no longer) ready.
    NotReady,
    /// Removed from the cluster.
    Deleted,
}
