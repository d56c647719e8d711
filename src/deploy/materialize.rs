// ABOUTME: Creates or updates the cluster resources backing a stack.
// ABOUTME: Fixed order: config maps, then secrets, then workloads.

use super::error::{DeployError, ResourceKind};
use crate::cluster::{ConfigMapOps, SecretOps, WorkloadOps};
use crate::stack::{self, Stack};
use std::collections::HashSet;

/// Create or replace one config map per file-based config source.
pub async fn create_file_based_config_maps(
    stack: &Stack,
    config_maps: &dyn ConfigMapOps,
) -> Result<(), DeployError> {
    for spec in stack::config_map_specs(stack) {
        tracing::debug!(name = %spec.name, "applying config map");
        config_maps
            .apply_config_map(&spec)
            .await
            .map_err(|source| DeployError::ResourceWrite {
                kind: ResourceKind::ConfigMap,
                name: spec.name.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Create or replace one secret per file-based secret source.
pub async fn create_file_based_secrets(
    stack: &Stack,
    secrets: &dyn SecretOps,
) -> Result<(), DeployError> {
    for spec in stack::secret_specs(stack) {
        tracing::debug!(name = %spec.name, "applying secret");
        secrets
            .apply_secret(&spec)
            .await
            .map_err(|source| DeployError::ResourceWrite {
                kind: ResourceKind::Secret,
                name: spec.name.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Create the workload for each service, or update it in place when one
/// with the same name already exists. Safe to call again with an
/// unchanged stack.
pub async fn create_or_update(
    stack: &Stack,
    workloads: &dyn WorkloadOps,
) -> Result<(), DeployError> {
    let existing = workloads
        .list_services()
        .await
        .map_err(|source| DeployError::ListServices { source })?;
    let present: HashSet<String> = existing.into_iter().map(|service| service.name).collect();

    for spec in stack::workload_specs(stack) {
        let result = if present.contains(&spec.name) {
            tracing::debug!(name = %spec.name, "updating workload");
            workloads.update_workload(&spec).await
        } else {
            tracing::debug!(name = %spec.name, "creating workload");
            workloads.create_workload(&spec).await
        };
        result.map_err(|source| DeployError::ResourceWrite {
            kind: ResourceKind::Workload,
            name: spec.name.clone(),
            source,
        })?;
    }
    Ok(())
}
