// ABOUTME: Cluster client layer: capability traits plus the kube-backed implementation.
// ABOUTME: Every handle is scoped to one namespace at construction time.

mod error;
mod kube;
mod traits;
mod types;

pub use error::{ClientError, ClientErrorKind, ResourceError};
pub use self::kube::KubeCluster;
pub use traits::{ConfigMapOps, PodOps, SecretOps, WorkloadOps};
pub use types::{
    ConfigMapSpec, ExistingService, MountSpec, PodEvent, PodReadiness, PortSpec, Protocol,
    SecretSpec, WorkloadSpec, MANAGED_LABEL, SERVICE_LABEL, STACK_LABEL,
};
