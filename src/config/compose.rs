// ABOUTME: Raw compose file model with custom deserializers.
// ABOUTME: Turns YAML service/config/secret maps into ordered, validated lists.

use crate::error::{Error, Result};
use crate::types::{ImageRef, ServiceName};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One parsed compose file. Service order matches the file; merging
/// preserves first-appearance order across files.
#[derive(Debug, Clone, Deserialize)]
pub struct ComposeFile {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(deserialize_with = "deserialize_services")]
    pub services: Vec<ServiceConfig>,

    #[serde(default, deserialize_with = "deserialize_sources")]
    pub configs: Vec<SourceEntry>,

    #[serde(default, deserialize_with = "deserialize_sources")]
    pub secrets: Vec<SourceEntry>,
}

/// One service definition from a compose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub name: ServiceName,
    pub image: ImageRef,
    pub replicas: u32,
    pub command: Option<Vec<String>>,
    pub environment: BTreeMap<String, String>,
    pub ports: Vec<String>,
    pub configs: Vec<AttachmentRef>,
    pub secrets: Vec<AttachmentRef>,
}

/// A service's reference to a declared config or secret source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub source: String,
    /// Mount path override inside the container.
    pub target: Option<String>,
}

/// A top-level file-based config or secret declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub file: PathBuf,
}

impl ComposeFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ComposeNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut compose = Self::from_yaml(&content)?;

        // Source paths are relative to the compose file that declares them.
        if let Some(base) = path.parent() {
            for entry in compose
                .configs
                .iter_mut()
                .chain(compose.secrets.iter_mut())
            {
                if entry.file.is_relative() {
                    entry.file = base.join(&entry.file);
                }
            }
        }
        Ok(compose)
    }

    /// Overlay `other` onto this file: same-named entries are replaced,
    /// new ones appended.
    pub fn merge(mut self, other: ComposeFile) -> ComposeFile {
        for service in other.services {
            match self.services.iter_mut().find(|s| s.name == service.name) {
                Some(slot) => *slot = service,
                None => self.services.push(service),
            }
        }
        merge_sources(&mut self.configs, other.configs);
        merge_sources(&mut self.secrets, other.secrets);
        if other.version.is_some() {
            self.version = other.version;
        }
        self
    }
}

fn merge_sources(existing: &mut Vec<SourceEntry>, incoming: Vec<SourceEntry>) {
    for entry in incoming {
        match existing.iter_mut().find(|e| e.name == entry.name) {
            Some(slot) => *slot = entry,
            None => existing.push(entry),
        }
    }
}

// Serde bodies for the map-shaped sections

#[derive(Debug, Deserialize)]
struct ServiceBody {
    image: String,

    #[serde(default)]
    command: Option<CommandEntry>,

    #[serde(default)]
    environment: Option<EnvEntry>,

    #[serde(default)]
    ports: Vec<String>,

    #[serde(default)]
    deploy: Option<DeploySection>,

    #[serde(default)]
    configs: Vec<AttachmentEntry>,

    #[serde(default)]
    secrets: Vec<AttachmentEntry>,
}

#[derive(Debug, Deserialize)]
struct DeploySection {
    #[serde(default)]
    replicas: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandEntry {
    Shell(String),
    Argv(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnvEntry {
    Map(BTreeMap<String, EnvScalar>),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnvScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl EnvScalar {
    fn render(self) -> String {
        match self {
            EnvScalar::Text(value) => value,
            EnvScalar::Integer(value) => value.to_string(),
            EnvScalar::Float(value) => value.to_string(),
            EnvScalar::Flag(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AttachmentEntry {
    Short(String),
    Long {
        source: String,
        #[serde(default)]
        target: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct SourceBody {
    #[serde(default)]
    file: Option<PathBuf>,
}

impl ServiceBody {
    fn into_service(self, name: ServiceName) -> std::result::Result<ServiceConfig, String> {
        let image =
            ImageRef::parse(&self.image).map_err(|e| format!("service {name}: {e}"))?;

        let command = self.command.map(|command| match command {
            CommandEntry::Argv(argv) => argv,
            CommandEntry::Shell(line) => {
                vec!["/bin/sh".to_string(), "-c".to_string(), line]
            }
        });

        let environment = match self.environment {
            None => BTreeMap::new(),
            Some(EnvEntry::Map(map)) => map
                .into_iter()
                .map(|(key, value)| (key, value.render()))
                .collect(),
            Some(EnvEntry::List(entries)) => {
                let mut map = BTreeMap::new();
                for entry in entries {
                    let (key, value) = entry.split_once('=').ok_or_else(|| {
                        format!("service {name}: environment entry {entry:?} is missing '='")
                    })?;
                    map.insert(key.to_string(), value.to_string());
                }
                map
            }
        };

        let replicas = self.deploy.and_then(|deploy| deploy.replicas).unwrap_or(1);

        Ok(ServiceConfig {
            name,
            image,
            replicas,
            command,
            environment,
            ports: self.ports,
            configs: attachments(self.configs),
            secrets: attachments(self.secrets),
        })
    }
}

fn attachments(entries: Vec<AttachmentEntry>) -> Vec<AttachmentRef> {
    entries
        .into_iter()
        .map(|entry| match entry {
            AttachmentEntry::Short(source) => AttachmentRef {
                source,
                target: None,
            },
            AttachmentEntry::Long { source, target } => AttachmentRef { source, target },
        })
        .collect()
}

fn deserialize_services<'de, D>(deserializer: D) -> std::result::Result<Vec<ServiceConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ServicesVisitor;

    impl<'de> Visitor<'de> for ServicesVisitor {
        type Value = Vec<ServiceConfig>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of service name to service definition")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut services = Vec::new();
            while let Some((name, body)) = map.next_entry::<String, ServiceBody>()? {
                let name = ServiceName::new(&name)
                    .map_err(|e| de::Error::custom(format!("service {name:?}: {e}")))?;
                services.push(body.into_service(name).map_err(de::Error::custom)?);
            }
            Ok(services)
        }
    }

    deserializer.deserialize_map(ServicesVisitor)
}

fn deserialize_sources<'de, D>(deserializer: D) -> std::result::Result<Vec<SourceEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SourcesVisitor;

    impl<'de> Visitor<'de> for SourcesVisitor {
        type Value = Vec<SourceEntry>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of source name to file-based definition")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::new();
            while let Some((name, body)) = map.next_entry::<String, SourceBody>()? {
                let file = body.file.ok_or_else(|| {
                    de::Error::custom(format!(
                        "source {name:?}: only file-based sources are supported"
                    ))
                })?;
                entries.push(SourceEntry { name, file });
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(SourcesVisitor)
}
