// ABOUTME: Data model for a materialized stack.
// ABOUTME: Plain data; deploy behavior lives in free functions elsewhere.

use crate::cluster::PortSpec;
use crate::config::{AttachmentRef, ConfigSource, SecretSource};
use crate::types::{ImageRef, Namespace, ServiceName};
use std::collections::BTreeMap;

/// The complete deployment unit for one namespace. A stack's identity is
/// its namespace; the name is derived from it.
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub namespace: Namespace,
    /// Services in configuration order. Names are unique within a stack.
    pub services: Vec<StackService>,
    pub config_maps: Vec<ConfigSource>,
    pub secrets: Vec<SecretSource>,
}

/// One service of a stack with its deploy-time expectations.
#[derive(Debug, Clone)]
pub struct StackService {
    pub name: ServiceName,
    pub image: ImageRef,
    /// Expected replica count, fixed at deploy time.
    pub replicas: u32,
    pub command: Option<Vec<String>>,
    pub environment: BTreeMap<String, String>,
    pub ports: Vec<PortSpec>,
    pub configs: Vec<AttachmentRef>,
    pub secrets: Vec<AttachmentRef>,
}
