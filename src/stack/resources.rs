// ABOUTME: Derives cluster resource specs from a stack.
// ABOUTME: Deterministic: declaration order in, declaration order out.

use super::model::{Stack, StackService};
use crate::cluster::{
    ConfigMapSpec, MANAGED_LABEL, MountSpec, SERVICE_LABEL, STACK_LABEL, SecretSpec, WorkloadSpec,
};
use crate::config::AttachmentRef;
use std::collections::BTreeMap;

const CONFIG_MOUNT_ROOT: &str = "/run/configs";
const SECRET_MOUNT_ROOT: &str = "/run/secrets";

fn stack_labels(stack: &Stack) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(STACK_LABEL.to_string(), stack.name.clone());
    labels.insert(MANAGED_LABEL.to_string(), "true".to_string());
    labels
}

fn service_labels(stack: &Stack, service: &StackService) -> BTreeMap<String, String> {
    let mut labels = stack_labels(stack);
    labels.insert(SERVICE_LABEL.to_string(), service.name.to_string());
    labels
}

/// One config map per file-based config source, in declaration order.
pub fn config_map_specs(stack: &Stack) -> Vec<ConfigMapSpec> {
    stack
        .config_maps
        .iter()
        .map(|source| ConfigMapSpec {
            name: source.name.clone(),
            labels: stack_labels(stack),
            data: BTreeMap::from([(source.name.clone(), source.content.clone())]),
        })
        .collect()
}

/// One secret per file-based secret source, in declaration order.
pub fn secret_specs(stack: &Stack) -> Vec<SecretSpec> {
    stack
        .secrets
        .iter()
        .map(|source| SecretSpec {
            name: source.name.clone(),
            labels: stack_labels(stack),
            data: BTreeMap::from([(source.name.clone(), source.content.clone())]),
        })
        .collect()
}

/// One workload per service, in service order.
pub fn workload_specs(stack: &Stack) -> Vec<WorkloadSpec> {
    stack
        .services
        .iter()
        .map(|service| WorkloadSpec {
            name: service.name.to_string(),
            labels: service_labels(stack, service),
            image: service.image.reference(),
            replicas: service.replicas,
            command: service.command.clone(),
            env: service.environment.clone(),
            ports: service.ports.clone(),
            config_mounts: mounts(&service.configs, CONFIG_MOUNT_ROOT),
            secret_mounts: mounts(&service.secrets, SECRET_MOUNT_ROOT),
        })
        .collect()
}

fn mounts(attachments: &[AttachmentRef], root: &str) -> Vec<MountSpec> {
    attachments
        .iter()
        .map(|attachment| MountSpec {
            source: attachment.source.clone(),
            path: attachment
                .target
                .clone()
                .unwrap_or_else(|| format!("{root}/{}", attachment.source)),
        })
        .collect()
}
