// ABOUTME: Deployment orchestration: resource materialization and readiness watching.
// ABOUTME: Exports the Deployer entry point and the watcher primitives.

mod deployer;
mod error;
mod materialize;
mod watcher;

pub use deployer::{DeployOpts, Deployer};
pub use error::{DeployError, ResourceKind, WatchError};
pub use materialize::{create_file_based_config_maps, create_file_based_secrets, create_or_update};
pub use watcher::{CompletionHandle, ServiceReadiness, watch};
