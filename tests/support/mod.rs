// ABOUTME: Test support utilities.
// ABOUTME: Mock cluster clients that record calls, plus scripted pod event feeds.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc;
use futures::stream::{self, BoxStream};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use stolos::cluster::{
    ConfigMapOps, ConfigMapSpec, ExistingService, PodEvent, PodOps, PodReadiness, ResourceError,
    STACK_LABEL, SecretOps, SecretSpec, WorkloadOps, WorkloadSpec,
};
use stolos::config::{ConfigSource, SecretSource, ServiceConfig, StackConfig};
use stolos::types::{ImageRef, Namespace, ServiceName};

/// One recorded mutation against the mock cluster, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ApplyConfigMap(String),
    ApplySecret(String),
    CreateWorkload(String),
    UpdateWorkload(String),
}

#[derive(Default)]
pub struct ClusterState {
    pub calls: Vec<Call>,
    pub existing: Vec<ExistingService>,
    pub config_maps: HashMap<String, ConfigMapSpec>,
    pub secrets: HashMap<String, SecretSpec>,
    pub workloads: HashMap<String, WorkloadSpec>,
    /// Fail the write of the named config map / secret / workload.
    pub fail_config_map: Option<String>,
    pub fail_secret: Option<String>,
    pub fail_workload: Option<String>,
    pub fail_list: bool,
}

/// In-memory cluster implementing the write-side capability traits.
#[derive(Clone, Default)]
pub struct MockCluster {
    pub state: Arc<Mutex<ClusterState>>,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(existing: Vec<ExistingService>) -> Self {
        let mock = Self::default();
        mock.state.lock().existing = existing;
        mock
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state.lock().calls.len()
    }
}

#[async_trait]
impl ConfigMapOps for MockCluster {
    async fn apply_config_map(&self, spec: &ConfigMapSpec) -> Result<(), ResourceError> {
        let mut state = self.state.lock();
        if state.fail_config_map.as_deref() == Some(spec.name.as_str()) {
            return Err(ResourceError::Api("injected config map failure".to_string()));
        }
        state.calls.push(Call::ApplyConfigMap(spec.name.clone()));
        state.config_maps.insert(spec.name.clone(), spec.clone());
        Ok(())
    }
}

#[async_trait]
impl SecretOps for MockCluster {
    async fn apply_secret(&self, spec: &SecretSpec) -> Result<(), ResourceError> {
        let mut state = self.state.lock();
        if state.fail_secret.as_deref() == Some(spec.name.as_str()) {
            return Err(ResourceError::Api("injected secret failure".to_string()));
        }
        state.calls.push(Call::ApplySecret(spec.name.clone()));
        state.secrets.insert(spec.name.clone(), spec.clone());
        Ok(())
    }
}

#[async_trait]
impl WorkloadOps for MockCluster {
    async fn list_services(&self) -> Result<Vec<ExistingService>, ResourceError> {
        let state = self.state.lock();
        if state.fail_list {
            return Err(ResourceError::Api("injected list failure".to_string()));
        }
        Ok(state.existing.clone())
    }

    async fn create_workload(&self, spec: &WorkloadSpec) -> Result<(), ResourceError> {
        let mut state = self.state.lock();
        if state.fail_workload.as_deref() == Some(spec.name.as_str()) {
            return Err(ResourceError::Api("injected workload failure".to_string()));
        }
        if state.workloads.contains_key(&spec.name) {
            return Err(ResourceError::AlreadyExists(spec.name.clone()));
        }
        state.calls.push(Call::CreateWorkload(spec.name.clone()));
        state.workloads.insert(spec.name.clone(), spec.clone());
        state.existing.push(ExistingService {
            name: spec.name.clone(),
            labels: spec.labels.clone(),
        });
        Ok(())
    }

    async fn update_workload(&self, spec: &WorkloadSpec) -> Result<(), ResourceError> {
        let mut state = self.state.lock();
        if state.fail_workload.as_deref() == Some(spec.name.as_str()) {
            return Err(ResourceError::Api("injected workload failure".to_string()));
        }
        if !state.workloads.contains_key(&spec.name) {
            return Err(ResourceError::NotFound(spec.name.clone()));
        }
        state.calls.push(Call::UpdateWorkload(spec.name.clone()));
        state.workloads.insert(spec.name.clone(), spec.clone());
        Ok(())
    }
}

/// Pod feed that replays a fixed script of events, then ends.
pub struct ScriptedPods {
    events: Mutex<Option<Vec<Result<PodEvent, ResourceError>>>>,
}

impl ScriptedPods {
    pub fn new(events: Vec<Result<PodEvent, ResourceError>>) -> Self {
        Self {
            events: Mutex::new(Some(events)),
        }
    }
}

impl PodOps for ScriptedPods {
    fn watch_pods(&self, _stack: &str) -> BoxStream<'static, Result<PodEvent, ResourceError>> {
        let events = self.events.lock().take().expect("watch_pods called twice");
        stream::iter(events).boxed()
    }
}

/// Pod feed driven interactively by the test through a channel. The feed
/// stays open as long as the sender is alive.
pub struct ChannelPods {
    rx: Mutex<Option<mpsc::UnboundedReceiver<Result<PodEvent, ResourceError>>>>,
}

pub fn channel_pods() -> (
    Arc<ChannelPods>,
    mpsc::UnboundedSender<Result<PodEvent, ResourceError>>,
) {
    let (tx, rx) = mpsc::unbounded();
    (
        Arc::new(ChannelPods {
            rx: Mutex::new(Some(rx)),
        }),
        tx,
    )
}

impl PodOps for ChannelPods {
    fn watch_pods(&self, _stack: &str) -> BoxStream<'static, Result<PodEvent, ResourceError>> {
        self.rx.lock().take().expect("watch_pods called twice").boxed()
    }
}

// Event helpers

pub fn pod_event(service: &str, pod: &str, readiness: PodReadiness) -> PodEvent {
    PodEvent {
        pod: pod.to_string(),
        service: ServiceName::new(service).unwrap(),
        readiness,
    }
}

pub fn ready(service: &str, pod: &str) -> Result<PodEvent, ResourceError> {
    Ok(pod_event(service, pod, PodReadiness::Ready))
}

pub fn not_ready(service: &str, pod: &str) -> Result<PodEvent, ResourceError> {
    Ok(pod_event(service, pod, PodReadiness::NotReady))
}

pub fn deleted(service: &str, pod: &str) -> Result<PodEvent, ResourceError> {
    Ok(pod_event(service, pod, PodReadiness::Deleted))
}

pub fn stream_error(message: &str) -> Result<PodEvent, ResourceError> {
    Err(ResourceError::Watch(message.to_string()))
}

// Configuration fixtures

pub fn namespace(name: &str) -> Namespace {
    Namespace::new(name).unwrap()
}

pub fn service(name: &str, replicas: u32) -> ServiceConfig {
    ServiceConfig {
        name: ServiceName::new(name).unwrap(),
        image: ImageRef::parse("nginx").unwrap(),
        replicas,
        command: None,
        environment: BTreeMap::new(),
        ports: Vec::new(),
        configs: Vec::new(),
        secrets: Vec::new(),
    }
}

pub fn stack_config(services: &[(&str, u32)]) -> StackConfig {
    StackConfig {
        services: services
            .iter()
            .map(|(name, replicas)| service(name, *replicas))
            .collect(),
        configs: Vec::new(),
        secrets: Vec::new(),
    }
}

pub fn config_source(name: &str, content: &str) -> ConfigSource {
    ConfigSource {
        name: name.to_string(),
        path: PathBuf::from(format!("{name}.txt")),
        content: content.to_string(),
    }
}

pub fn secret_source(name: &str, content: &[u8]) -> SecretSource {
    SecretSource {
        name: name.to_string(),
        path: PathBuf::from(format!("{name}.txt")),
        content: content.to_vec(),
    }
}

// Existing-service fixtures

pub fn owned_service(name: &str, stack: &str) -> ExistingService {
    ExistingService {
        name: name.to_string(),
        labels: BTreeMap::from([(STACK_LABEL.to_string(), stack.to_string())]),
    }
}

pub fn foreign_service(name: &str) -> ExistingService {
    ExistingService {
        name: name.to_string(),
        labels: BTreeMap::new(),
    }
}
