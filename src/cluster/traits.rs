// ABOUTME: Capability traits for namespace-scoped cluster resource handles.
// ABOUTME: ConfigMapOps, SecretOps, WorkloadOps, and the PodOps event feed.

use super::error::ResourceError;
use super::types::{ConfigMapSpec, ExistingService, PodEvent, SecretSpec, WorkloadSpec};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Config map operations.
#[async_trait]
pub trait ConfigMapOps: Send + Sync {
    /// Create the config map, replacing it if it already exists.
    async fn apply_config_map(&self, spec: &ConfigMapSpec) -> Result<(), ResourceError>;
}

/// Secret operations.
#[async_trait]
pub trait SecretOps: Send + Sync {
    /// Create the secret, replacing it if it already exists.
    async fn apply_secret(&self, spec: &SecretSpec) -> Result<(), ResourceError>;
}

/// Workload and network-exposure operations.
#[async_trait]
pub trait WorkloadOps: Send + Sync {
    /// List the services currently deployed in the namespace.
    async fn list_services(&self) -> Result<Vec<ExistingService>, ResourceError>;

    /// Create the workload backing a service.
    async fn create_workload(&self, spec: &WorkloadSpec) -> Result<(), ResourceError>;

    /// Update an existing workload in place, preserving cluster-assigned
    /// fields the caller must not overwrite.
    async fn update_workload(&self, spec: &WorkloadSpec) -> Result<(), ResourceError>;
}

/// Pod status subscription.
pub trait PodOps: Send + Sync {
    /// Subscribe to readiness events for every pod of the given stack.
    /// The stream ends only when the underlying watch does.
    fn watch_pods(&self, stack: &str) -> BoxStream<'static, Result<PodEvent, ResourceError>>;
}
