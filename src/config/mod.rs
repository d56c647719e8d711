// ABOUTME: Compose-style configuration loading for stolos stacks.
// ABOUTME: Parses YAML, merges multiple files, and resolves file-based sources.

mod compose;

pub use compose::{AttachmentRef, ComposeFile, ServiceConfig, SourceEntry};

use crate::error::{Error, Result};
use nonempty::NonEmpty;
use std::path::PathBuf;

/// A fully resolved stack definition: parsed services plus the contents
/// of every file-based config and secret source. The deployment core
/// treats this as trusted input.
#[derive(Debug, Clone, Default)]
pub struct StackConfig {
    pub services: Vec<ServiceConfig>,
    pub configs: Vec<ConfigSource>,
    pub secrets: Vec<SecretSource>,
}

/// A file-based config source with its content resolved to text.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// A file-based secret source with its content resolved to bytes.
#[derive(Debug, Clone)]
pub struct SecretSource {
    pub name: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Load and merge the given compose files, then resolve every file-based
/// source. Later files override same-named entries from earlier ones.
pub fn load_compose_files(files: &NonEmpty<PathBuf>) -> Result<StackConfig> {
    let mut merged = ComposeFile::load(&files.head)?;
    for path in &files.tail {
        merged = merged.merge(ComposeFile::load(path)?);
    }
    merged.resolve()
}

impl ComposeFile {
    /// Read every file-based source into memory.
    pub fn resolve(self) -> Result<StackConfig> {
        let mut configs = Vec::new();
        for entry in self.configs {
            let bytes = std::fs::read(&entry.file).map_err(|source| Error::SourceFile {
                kind: "config",
                name: entry.name.clone(),
                path: entry.file.clone(),
                source,
            })?;
            let content = String::from_utf8(bytes).map_err(|_| Error::SourceNotUtf8 {
                name: entry.name.clone(),
            })?;
            configs.push(ConfigSource {
                name: entry.name,
                path: entry.file,
                content,
            });
        }

        let mut secrets = Vec::new();
        for entry in self.secrets {
            let content = std::fs::read(&entry.file).map_err(|source| Error::SourceFile {
                kind: "secret",
                name: entry.name.clone(),
                path: entry.file.clone(),
                source,
            })?;
            secrets.push(SecretSource {
                name: entry.name,
                path: entry.file,
                content,
            });
        }

        Ok(StackConfig {
            services: self.services,
            configs,
            secrets,
        })
    }
}
