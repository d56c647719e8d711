// ABOUTME: kube-rs backed implementation of the cluster capability traits.
// ABOUTME: Builds namespace-scoped API handles and maps errors into ResourceError.

mod convert;

use super::error::{BuildSnafu, ClientError, InferSnafu, ResourceError};
use super::traits::{ConfigMapOps, PodOps, SecretOps, WorkloadOps};
use super::types::{ConfigMapSpec, ExistingService, PodEvent, SecretSpec, STACK_LABEL, WorkloadSpec};
use crate::types::Namespace;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Pod, Secret, Service};
use kube::api::{Api, ListParams, PostParams};
use kube::runtime::watcher;
use kube::{Client, Config};
use snafu::ResultExt;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_api_error(e: kube::Error) -> ResourceError {
    match &e {
        kube::Error::Api(response) if response.code == 404 => {
            ResourceError::NotFound(response.message.clone())
        }
        kube::Error::Api(response) if response.code == 409 => {
            ResourceError::AlreadyExists(response.message.clone())
        }
        _ => ResourceError::Api(e.to_string()),
    }
}

fn is_already_exists(e: &kube::Error) -> bool {
    matches!(e, kube::Error::Api(response) if response.code == 409)
}

/// Namespace-scoped handles to the cluster resources stolos manages.
pub struct KubeCluster {
    namespace: String,
    config_maps: Api<ConfigMap>,
    secrets: Api<Secret>,
    deployments: Api<Deployment>,
    services: Api<Service>,
    pods: Api<Pod>,
}

impl KubeCluster {
    /// Connect using the ambient kubeconfig or in-cluster environment.
    pub async fn connect(namespace: &Namespace) -> Result<Self, ClientError> {
        let config = Config::infer().await.context(InferSnafu)?;
        let client = Client::try_from(config).context(BuildSnafu)?;
        Ok(Self::with_client(client, namespace))
    }

    /// Build handles on top of an already constructed client.
    pub fn with_client(client: Client, namespace: &Namespace) -> Self {
        let ns = namespace.as_str();
        Self {
            namespace: ns.to_string(),
            config_maps: Api::namespaced(client.clone(), ns),
            secrets: Api::namespaced(client.clone(), ns),
            deployments: Api::namespaced(client.clone(), ns),
            services: Api::namespaced(client.clone(), ns),
            pods: Api::namespaced(client, ns),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl ConfigMapOps for KubeCluster {
    async fn apply_config_map(&self, spec: &ConfigMapSpec) -> Result<(), ResourceError> {
        let object = convert::config_map(spec, &self.namespace);
        let pp = PostParams::default();
        match self.config_maps.create(&pp, &object).await {
            Ok(_) => Ok(()),
            Err(e) if is_already_exists(&e) => {
                let existing = self
                    .config_maps
                    .get(&spec.name)
                    .await
                    .map_err(map_api_error)?;
                let mut replacement = object;
                replacement.metadata.resource_version = existing.metadata.resource_version;
                self.config_maps
                    .replace(&spec.name, &pp, &replacement)
                    .await
                    .map_err(map_api_error)?;
                Ok(())
            }
            Err(e) => Err(map_api_error(e)),
        }
    }
}

#[async_trait]
impl SecretOps for KubeCluster {
    async fn apply_secret(&self, spec: &SecretSpec) -> Result<(), ResourceError> {
        let object = convert::secret(spec, &self.namespace);
        let pp = PostParams::default();
        match self.secrets.create(&pp, &object).await {
            Ok(_) => Ok(()),
            Err(e) if is_already_exists(&e) => {
                let existing = self.secrets.get(&spec.name).await.map_err(map_api_error)?;
                let mut replacement = object;
                replacement.metadata.resource_version = existing.metadata.resource_version;
                self.secrets
                    .replace(&spec.name, &pp, &replacement)
                    .await
                    .map_err(map_api_error)?;
                Ok(())
            }
            Err(e) => Err(map_api_error(e)),
        }
    }
}

#[async_trait]
impl WorkloadOps for KubeCluster {
    async fn list_services(&self) -> Result<Vec<ExistingService>, ResourceError> {
        let deployments = self
            .deployments
            .list(&ListParams::default())
            .await
            .map_err(map_api_error)?;
        Ok(deployments
            .items
            .into_iter()
            .filter_map(|deployment| {
                Some(ExistingService {
                    name: deployment.metadata.name?,
                    labels: deployment.metadata.labels.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn create_workload(&self, spec: &WorkloadSpec) -> Result<(), ResourceError> {
        let pp = PostParams::default();
        let deployment = convert::deployment(spec, &self.namespace);
        self.deployments
            .create(&pp, &deployment)
            .await
            .map_err(map_api_error)?;

        if let Some(service) = convert::service(spec, &self.namespace) {
            self.services
                .create(&pp, &service)
                .await
                .map_err(map_api_error)?;
        }
        Ok(())
    }

    async fn update_workload(&self, spec: &WorkloadSpec) -> Result<(), ResourceError> {
        let pp = PostParams::default();
        let existing = self
            .deployments
            .get(&spec.name)
            .await
            .map_err(map_api_error)?;
        let mut deployment = convert::deployment(spec, &self.namespace);
        deployment.metadata.resource_version = existing.metadata.resource_version;
        self.deployments
            .replace(&spec.name, &pp, &deployment)
            .await
            .map_err(map_api_error)?;

        let Some(mut service) = convert::service(spec, &self.namespace) else {
            return Ok(());
        };
        match self
            .services
            .get_opt(&spec.name)
            .await
            .map_err(map_api_error)?
        {
            Some(current) => {
                service.metadata.resource_version = current.metadata.resource_version.clone();
                // The cluster assigns and owns the ClusterIP; a replace
                // without it is rejected.
                if let (Some(new_spec), Some(current_spec)) =
                    (service.spec.as_mut(), current.spec.as_ref())
                {
                    new_spec.cluster_ip = current_spec.cluster_ip.clone();
                    new_spec.cluster_ips = current_spec.cluster_ips.clone();
                }
                self.services
                    .replace(&spec.name, &pp, &service)
                    .await
                    .map_err(map_api_error)?;
            }
            None => {
                self.services
                    .create(&pp, &service)
                    .await
                    .map_err(map_api_error)?;
            }
        }
        Ok(())
    }
}

impl PodOps for KubeCluster {
    fn watch_pods(&self, stack: &str) -> BoxStream<'static, Result<PodEvent, ResourceError>> {
        let selector = format!("{STACK_LABEL}={stack}");
        let config = watcher::Config::default().labels(&selector);
        watcher(self.pods.clone(), config)
            .map(|step| match step {
                Ok(event) => Ok(convert::pod_event(event)),
                Err(e) => Err(ResourceError::Watch(e.to_string())),
            })
            .filter_map(|step| async move { step.transpose() })
            .boxed()
    }
}
