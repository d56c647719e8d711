// ABOUTME: Deploy command implementation.
// ABOUTME: Connects the cluster clients and runs the deploy orchestrator.

use std::sync::Arc;
use stolos::cluster::KubeCluster;
use stolos::deploy::{DeployOpts, Deployer};
use stolos::error::Result;
use stolos::output::{Output, OutputMode};

/// Deploy the stack described by `opts` and wait for it to stabilize.
pub async fn deploy(opts: DeployOpts, mode: OutputMode) -> Result<()> {
    let cluster = Arc::new(KubeCluster::connect(&opts.namespace).await?);
    let output = Output::stdout(mode);
    let deployer = Deployer::new(
        cluster.clone(),
        cluster.clone(),
        cluster.clone(),
        cluster,
        output,
    );
    deployer.run_deploy(&opts).await
}
