// ABOUTME: Conversions from client-agnostic resource specs to Kubernetes objects.
// ABOUTME: Also classifies raw watch events into pod readiness events.

use super::super::types::{
    ConfigMapSpec, PodEvent, PodReadiness, Protocol, SERVICE_LABEL, STACK_LABEL, SecretSpec,
    WorkloadSpec,
};
use crate::types::ServiceName;
use k8s_openapi::ByteString;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, EnvVar, Pod, PodSpec,
    PodTemplateSpec, Secret, SecretVolumeSource, Service, ServicePort, ServiceSpec, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::runtime::watcher::Event;
use std::collections::BTreeMap;

fn metadata(name: &str, namespace: &str, labels: &BTreeMap<String, String>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(labels.clone()),
        ..Default::default()
    }
}

/// Identity labels only: the subset the pod selector matches on.
fn selector_labels(labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    labels
        .iter()
        .filter(|(key, _)| *key == STACK_LABEL || *key == SERVICE_LABEL)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub(super) fn config_map(spec: &ConfigMapSpec, namespace: &str) -> ConfigMap {
    ConfigMap {
        metadata: metadata(&spec.name, namespace, &spec.labels),
        data: Some(spec.data.clone()),
        ..Default::default()
    }
}

pub(super) fn secret(spec: &SecretSpec, namespace: &str) -> Secret {
    Secret {
        metadata: metadata(&spec.name, namespace, &spec.labels),
        data: Some(
            spec.data
                .iter()
                .map(|(key, value)| (key.clone(), ByteString(value.clone())))
                .collect(),
        ),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}

pub(super) fn deployment(spec: &WorkloadSpec, namespace: &str) -> Deployment {
    let env: Vec<EnvVar> = spec
        .env
        .iter()
        .map(|(name, value)| EnvVar {
            name: name.clone(),
            value: Some(value.clone()),
            ..Default::default()
        })
        .collect();

    let ports: Vec<ContainerPort> = spec
        .ports
        .iter()
        .map(|port| ContainerPort {
            container_port: i32::from(port.target),
            protocol: Some(protocol_name(port.protocol).to_string()),
            ..Default::default()
        })
        .collect();

    let mut volumes = Vec::new();
    let mut mounts = Vec::new();
    for mount in &spec.config_mounts {
        let volume = format!("config-{}", mount.source);
        volumes.push(Volume {
            name: volume.clone(),
            config_map: Some(ConfigMapVolumeSource {
                name: mount.source.clone(),
                ..Default::default()
            }),
            ..Default::default()
        });
        mounts.push(VolumeMount {
            name: volume,
            mount_path: mount.path.clone(),
            read_only: Some(true),
            ..Default::default()
        });
    }
    for mount in &spec.secret_mounts {
        let volume = format!("secret-{}", mount.source);
        volumes.push(Volume {
            name: volume.clone(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(mount.source.clone()),
                ..Default::default()
            }),
            ..Default::default()
        });
        mounts.push(VolumeMount {
            name: volume,
            mount_path: mount.path.clone(),
            read_only: Some(true),
            ..Default::default()
        });
    }

    let container = Container {
        name: spec.name.clone(),
        image: Some(spec.image.clone()),
        command: spec.command.clone(),
        env: (!env.is_empty()).then_some(env),
        ports: (!ports.is_empty()).then_some(ports),
        volume_mounts: (!mounts.is_empty()).then_some(mounts),
        ..Default::default()
    };

    Deployment {
        metadata: metadata(&spec.name, namespace, &spec.labels),
        spec: Some(DeploymentSpec {
            replicas: Some(spec.replicas as i32),
            selector: LabelSelector {
                match_labels: Some(selector_labels(&spec.labels)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(spec.labels.clone()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: (!volumes.is_empty()).then_some(volumes),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The exposure object for a workload, or `None` when no port is published.
pub(super) fn service(spec: &WorkloadSpec, namespace: &str) -> Option<Service> {
    let ports: Vec<ServicePort> = spec
        .ports
        .iter()
        .filter_map(|port| {
            let published = port.published?;
            Some(ServicePort {
                name: Some(format!("port-{published}")),
                port: i32::from(published),
                target_port: Some(IntOrString::Int(i32::from(port.target))),
                protocol: Some(protocol_name(port.protocol).to_string()),
                ..Default::default()
            })
        })
        .collect();
    if ports.is_empty() {
        return None;
    }

    Some(Service {
        metadata: metadata(&spec.name, namespace, &spec.labels),
        spec: Some(ServiceSpec {
            selector: Some(selector_labels(&spec.labels)),
            ports: Some(ports),
            ..Default::default()
        }),
        ..Default::default()
    })
}

fn protocol_name(protocol: Protocol) -> &'static str {
    match protocol {
        Protocol::Tcp => "TCP",
        Protocol::Udp => "UDP",
    }
}

pub(super) fn pod_event(event: Event<Pod>) -> Option<PodEvent> {
    match event {
        Event::Apply(pod) | Event::InitApply(pod) => classify(pod, false),
        Event::Delete(pod) => classify(pod, true),
        Event::Init | Event::InitDone => None,
    }
}

fn classify(pod: Pod, deleted: bool) -> Option<PodEvent> {
    let name = pod.metadata.name.clone()?;
    let service = pod
        .metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(SERVICE_LABEL))
        .and_then(|value| ServiceName::new(value).ok())?;

    let readiness = if deleted {
        PodReadiness::Deleted
    } else if pod.metadata.deletion_timestamp.is_some() {
        // A terminating pod can still report Ready for a moment.
        PodReadiness::NotReady
    } else if is_ready(&pod) {
        PodReadiness::Ready
    } else {
        PodReadiness::NotReady
    };

    Some(PodEvent {
        pod: name,
        service,
        readiness,
    })
}

fn is_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|condition| condition.type_ == "Ready" && condition.status == "True")
        })
}
