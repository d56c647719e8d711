// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers configuration, collision, resource writes, and the readiness watch.

use crate::cluster::ResourceError;
use crate::stack::{BuildError, CollisionError};
use std::fmt;
use std::time::Duration;

/// Errors that can abort a deploy. Everything here short-circuits the
/// remaining steps; earlier writes are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// No compose file was supplied.
    #[error("no compose file specified (use --compose-file)")]
    NoComposeFile,

    /// The stack definition itself is unusable.
    #[error("invalid stack configuration: {0}")]
    InvalidConfig(#[from] BuildError),

    /// An unrelated resource occupies a wanted service name.
    #[error(transparent)]
    Collision(#[from] CollisionError),

    /// The pre-deploy service listing failed.
    #[error("failed to list services in the target namespace: {source}")]
    ListServices { source: ResourceError },

    /// Creating or updating a resource failed. Writes that already
    /// succeeded in this deploy are left in place.
    #[error("failed to write {kind} {name:?}: {source}")]
    ResourceWrite {
        kind: ResourceKind,
        name: String,
        source: ResourceError,
    },

    /// The readiness watch failed before the stack became stable.
    #[error("error while waiting for the stack to stabilize: {0}")]
    Watch(#[from] WatchError),

    /// The caller-imposed deadline expired before the stack became stable.
    #[error("stack did not become stable within {}", humantime::format_duration(*.timeout))]
    Timeout { timeout: Duration },
}

/// The kind of resource a failed write was targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ConfigMap,
    Secret,
    Workload,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::ConfigMap => "config map",
            ResourceKind::Secret => "secret",
            ResourceKind::Workload => "workload",
        };
        write!(f, "{name}")
    }
}

/// Errors terminating a watch session without reaching Stable.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("pod event stream failed: {source}")]
    Stream { source: ResourceError },

    #[error("pod event stream ended before the stack became stable")]
    StreamClosed,

    #[error("watch task terminated without reporting an outcome")]
    SessionLost,
}
