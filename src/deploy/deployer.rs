// ABOUTME: The deploy orchestrator: sequences build, checks, writes, and the wait.
// ABOUTME: Clients and the output sink are injected; there is no ambient state.

use super::error::DeployError;
use super::materialize::{
    create_file_based_config_maps, create_file_based_secrets, create_or_update,
};
use super::watcher::watch;
use crate::cluster::{ConfigMapOps, PodOps, SecretOps, WorkloadOps};
use crate::config::{self, StackConfig};
use crate::error::Result;
use crate::output::Output;
use crate::stack::{build_stack, check_collision};
use crate::types::Namespace;
use nonempty::NonEmpty;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Options for one deploy invocation.
#[derive(Debug, Clone)]
pub struct DeployOpts {
    /// Target namespace; doubles as the stack name.
    pub namespace: Namespace,
    /// Compose files to load, in override order.
    pub compose_files: Vec<PathBuf>,
    /// Give up if the stack is not stable within this duration.
    pub timeout: Option<Duration>,
}

/// Deploys one stack end to end against injected cluster clients.
pub struct Deployer {
    config_maps: Arc<dyn ConfigMapOps>,
    secrets: Arc<dyn SecretOps>,
    workloads: Arc<dyn WorkloadOps>,
    pods: Arc<dyn PodOps>,
    output: Output,
}

impl Deployer {
    pub fn new(
        config_maps: Arc<dyn ConfigMapOps>,
        secrets: Arc<dyn SecretOps>,
        workloads: Arc<dyn WorkloadOps>,
        pods: Arc<dyn PodOps>,
        output: Output,
    ) -> Self {
        Self {
            config_maps,
            secrets,
            workloads,
            pods,
            output,
        }
    }

    /// Load the compose files named in `opts` and deploy the result.
    pub async fn run_deploy(&self, opts: &DeployOpts) -> Result<()> {
        let files = NonEmpty::from_vec(opts.compose_files.clone())
            .ok_or(DeployError::NoComposeFile)?;
        let config = config::load_compose_files(&files)?;
        self.deploy(opts, &config).await?;
        Ok(())
    }

    /// Deploy a parsed stack configuration. Each step gates the next; the
    /// first failure is returned and no later step runs.
    pub async fn deploy(
        &self,
        opts: &DeployOpts,
        config: &StackConfig,
    ) -> std::result::Result<(), DeployError> {
        let stack = build_stack(&opts.namespace, config)?;

        let existing = self
            .workloads
            .list_services()
            .await
            .map_err(|source| DeployError::ListServices { source })?;
        check_collision(&existing, &stack)?;

        create_file_based_config_maps(&stack, self.config_maps.as_ref()).await?;
        create_file_based_secrets(&stack, self.secrets.as_ref()).await?;
        create_or_update(&stack, self.workloads.as_ref()).await?;

        self.output
            .progress("Waiting for the stack to be stable and running...");

        let handle = watch(Arc::clone(&self.pods), &stack);
        match opts.timeout {
            Some(timeout) => tokio::time::timeout(timeout, handle.wait())
                .await
                .map_err(|_| DeployError::Timeout { timeout })??,
            None => handle.wait().await?,
        }

        self.output
            .success(&format!("Stack {} is stable and running", stack.name));
        Ok(())
    }
}
