//! Typed errors for the injection engine.
//!
//! Library code returns [`ChaosError`]; the CLI wraps it in `anyhow` and maps
//! variants to exit codes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChaosError {
    /// Requested fault id is not in the registry.
    #[error("unknown fault type '{id}' (run `chaos list` to see available faults)")]
    UnknownFault { id: String },

    /// A required source path does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// `restore` was asked to run with no manifest present.
    #[error("no backup found")]
    NoBackup,

    /// Manifest exists but cannot be parsed or is missing fields.
    #[error("corrupt backup manifest {}: {reason}", path.display())]
    CorruptManifest { path: PathBuf, reason: String },

    /// A previous injection has not been restored yet.
    #[error(
        "fault '{fault_type}' is already injected (backup {backup_id}); run `chaos restore` first or pass --force"
    )]
    AlreadyInjected {
        fault_type: String,
        backup_id: String,
    },

    #[error("invalid fault registry: {0}")]
    InvalidRegistry(String),

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("json {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ChaosError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChaosError>;
