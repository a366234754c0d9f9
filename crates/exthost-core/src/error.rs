//! Error types for exthost-core

use std::path::PathBuf;

use crate::hooks::{HookError, HookPhase};
use crate::kind::KindId;
use crate::registry::ExtensionId;

/// Result type for exthost-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// A dependency could not be satisfied while enabling an extension.
///
/// Raised for a required sibling that is not registered, and for a
/// capability set requested through `include` that the resolved sibling
/// does not export.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingDependencyError {
    #[error("extension '{dependency}' not found for extension '{extension}'")]
    Extension { extension: String, dependency: String },

    #[error("capability '{capability}' not found in extension '{provider}'")]
    Capability { capability: String, provider: String },
}

impl MissingDependencyError {
    /// Name of the thing that could not be found (extension or capability).
    pub fn missing(&self) -> &str {
        match self {
            Self::Extension { dependency, .. } => dependency,
            Self::Capability { capability, .. } => capability,
        }
    }
}

/// Errors that can occur in exthost-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    MissingDependency(#[from] MissingDependencyError),

    #[error("unknown extension id {0}")]
    UnknownExtension(ExtensionId),

    #[error("unknown extension kind {0}")]
    UnknownKind(KindId),

    #[error("extension '{extension}' has no accessor for dependency '{dependency}'")]
    UnboundDependency { extension: String, dependency: String },

    #[error("extension '{extension}' has no capability operation '{operation}'")]
    UnknownOperation { extension: String, operation: String },

    #[error("operation '{operation}' of capability '{capability}' failed: {source}")]
    Operation {
        capability: String,
        operation: String,
        #[source]
        source: HookError,
    },

    #[error("{phase} hook of extension '{extension}' failed: {source}")]
    Hook {
        extension: String,
        phase: HookPhase,
        #[source]
        source: HookError,
    },

    #[error(transparent)]
    Fs(#[from] exthost_fs::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse extension manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("extension manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("invalid extension name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid extension manifest: {reason}")]
    InvalidManifest { reason: String },

    #[error("invalid config at {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

impl Error {
    /// The missing-dependency detail, if this is a missing-dependency error.
    pub fn as_missing_dependency(&self) -> Option<&MissingDependencyError> {
        match self {
            Self::MissingDependency(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_missing_dependency(&self) -> bool {
        self.as_missing_dependency().is_some()
    }
}
