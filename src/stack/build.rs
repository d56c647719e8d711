// ABOUTME: Builds a deployable Stack from a resolved configuration.
// ABOUTME: Validates service uniqueness, source references, and port mappings.

use super::model::{Stack, StackService};
use crate::cluster::{PortSpec, Protocol};
use crate::config::StackConfig;
use crate::types::{NameError, Namespace, ServiceName, validate_label};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("stack configuration defines no services")]
    NoServices,

    #[error("duplicate service name: {0}")]
    DuplicateService(ServiceName),

    #[error("invalid {kind} source name {name:?}: {source}")]
    InvalidSourceName {
        kind: &'static str,
        name: String,
        source: NameError,
    },

    #[error("service {service} references undeclared config {name:?}")]
    UnknownConfig { service: ServiceName, name: String },

    #[error("service {service} references undeclared secret {name:?}")]
    UnknownSecret { service: ServiceName, name: String },

    #[error("service {service} has an invalid port mapping {mapping:?}")]
    InvalidPort {
        service: ServiceName,
        mapping: String,
    },
}

/// Build the deployable stack for `namespace` from a resolved
/// configuration. Service order follows the configuration; the stack
/// name is the namespace.
pub fn build_stack(namespace: &Namespace, config: &StackConfig) -> Result<Stack, BuildError> {
    if config.services.is_empty() {
        return Err(BuildError::NoServices);
    }

    for source in &config.configs {
        validate_label(&source.name).map_err(|e| BuildError::InvalidSourceName {
            kind: "config",
            name: source.name.clone(),
            source: e,
        })?;
    }
    for source in &config.secrets {
        validate_label(&source.name).map_err(|e| BuildError::InvalidSourceName {
            kind: "secret",
            name: source.name.clone(),
            source: e,
        })?;
    }

    let config_names: HashSet<&str> = config.configs.iter().map(|s| s.name.as_str()).collect();
    let secret_names: HashSet<&str> = config.secrets.iter().map(|s| s.name.as_str()).collect();

    let mut seen = HashSet::new();
    let mut services = Vec::with_capacity(config.services.len());
    for service in &config.services {
        if !seen.insert(service.name.clone()) {
            return Err(BuildError::DuplicateService(service.name.clone()));
        }

        for attachment in &service.configs {
            if !config_names.contains(attachment.source.as_str()) {
                return Err(BuildError::UnknownConfig {
                    service: service.name.clone(),
                    name: attachment.source.clone(),
                });
            }
        }
        for attachment in &service.secrets {
            if !secret_names.contains(attachment.source.as_str()) {
                return Err(BuildError::UnknownSecret {
                    service: service.name.clone(),
                    name: attachment.source.clone(),
                });
            }
        }

        let ports = service
            .ports
            .iter()
            .map(|mapping| {
                parse_port(mapping).ok_or_else(|| BuildError::InvalidPort {
                    service: service.name.clone(),
                    mapping: mapping.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        services.push(StackService {
            name: service.name.clone(),
            image: service.image.clone(),
            replicas: service.replicas,
            command: service.command.clone(),
            environment: service.environment.clone(),
            ports,
            configs: service.configs.clone(),
            secrets: service.secrets.clone(),
        });
    }

    Ok(Stack {
        name: namespace.as_str().to_string(),
        namespace: namespace.clone(),
        services,
        config_maps: config.configs.clone(),
        secrets: config.secrets.clone(),
    })
}

/// Parse a port mapping like "80", "8080:80", or "53:53/udp".
fn parse_port(mapping: &str) -> Option<PortSpec> {
    let (ports, protocol) = match mapping.split_once('/') {
        Some((ports, "tcp")) => (ports, Protocol::Tcp),
        Some((ports, "udp")) => (ports, Protocol::Udp),
        Some(_) => return None,
        None => (mapping, Protocol::Tcp),
    };

    match ports.split_once(':') {
        Some((published, target)) => Some(PortSpec {
            published: Some(published.parse().ok()?),
            target: target.parse().ok()?,
            protocol,
        }),
        None => Some(PortSpec {
            published: None,
            target: ports.parse().ok()?,
            protocol,
        }),
    }
}
