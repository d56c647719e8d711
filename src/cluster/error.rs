// ABOUTME: Error types for the cluster client layer.
// ABOUTME: ResourceError covers per-resource operations, ClientError covers construction.

use snafu::Snafu;

/// Errors from operations on individual cluster resources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("watch stream error: {0}")]
    Watch(String),
}

/// Unified error for cluster client construction failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientError {
    #[snafu(display("failed to infer cluster configuration: {source}"))]
    Infer {
        source: kube::config::InferConfigError,
    },

    #[snafu(display("failed to build cluster client: {source}"))]
    Build { source: kube::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// No usable kubeconfig or in-cluster environment was found.
    NoClusterConfig,
    /// The client could not be constructed from the discovered config.
    ConstructionFailed,
}

impl ClientError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ClientErrorKind {
        match self {
            ClientError::Infer { .. } => ClientErrorKind::NoClusterConfig,
            ClientError::Build { .. } => ClientErrorKind::ConstructionFailed,
        }
    }
}
