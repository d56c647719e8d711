// ABOUTME: Application-wide error types for stolos.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::cluster::ClientError;
use crate::deploy::DeployError;
use crate::types::NameError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("compose file not found: {0}")]
    ComposeNotFound(PathBuf),

    #[error("invalid namespace: {0}")]
    InvalidNamespace(#[from] NameError),

    #[error("failed to read {kind} source {name:?} from {file}: {source}", file = .path.display())]
    SourceFile {
        kind: &'static str,
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config source {name:?} is not valid UTF-8")]
    SourceNotUtf8 { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

pub type Result<T> = std::result::Result<T, Error>;
