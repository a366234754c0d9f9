//! Extension manifest parsing for `extension.toml` files.
//!
//! A manifest declares an extension without code: its identity, the
//! capability sets it exports, and its required and optional siblings.
//! Dependency tables keep their declaration order.
//!
//! # Example TOML
//!
//! ```toml
//! [extension]
//! name = "Admin"
//! version = "0.1"
//! description = "Server administration commands"
//! capabilities = ["AdminTools"]
//!
//! [requires]
//! Core = { include = ["Helpers", "Utils"] }
//!
//! [optional]
//! Chat = { include = "Helpers" }
//! Stats = {}
//! ```

use std::path::Path;

use exthost_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::capability::CapabilitySet;
use crate::dependency::{DependencyKind, DependencySpec};
use crate::error::{Error, Result};
use crate::kind::ExtensionDefinition;

/// The canonical filename for extension manifest files.
pub const MANIFEST_FILENAME: &str = "extension.toml";

/// Complete extension manifest loaded from `extension.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionManifest {
    pub extension: ExtensionMeta,
    /// Required siblings, `name = { include = ... }`.
    #[serde(default)]
    pub requires: toml::Table,
    /// Optional siblings, same shape as `requires`.
    #[serde(default)]
    pub optional: toml::Table,
}

/// Identity and exports of an extension.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionMeta {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Names of the capability sets this extension exports.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl ExtensionManifest {
    /// Parse and validate a manifest from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    ///
    /// Syntax errors are reported with the file path as
    /// [`exthost_fs::Error::ConfigParse`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let path = NormalizedPath::new(path);
        if !path.is_file() {
            return Err(Error::ManifestNotFound(path.to_native()));
        }
        let manifest: Self = ConfigStore::new().load(&path)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn name(&self) -> &str {
        &self.extension.name
    }

    pub fn version(&self) -> &str {
        &self.extension.version
    }

    pub fn dependencies(&self, kind: DependencyKind) -> Result<DependencySpec> {
        let table = match kind {
            DependencyKind::Required => &self.requires,
            DependencyKind::Optional => &self.optional,
        };
        Ok(DependencySpec::from_table(table)?)
    }

    /// Build the extension type this manifest declares.
    ///
    /// Exported capabilities become sets without operations; they can be
    /// composed but have nothing to invoke.
    pub fn to_definition(&self) -> Result<ExtensionDefinition> {
        let mut builder = ExtensionDefinition::builder(self.name(), self.version())
            .dependencies(
                DependencyKind::Required,
                self.dependencies(DependencyKind::Required)?,
            )
            .dependencies(
                DependencyKind::Optional,
                self.dependencies(DependencyKind::Optional)?,
            );
        if let Some(description) = &self.extension.description {
            builder = builder.description(description);
        }
        for capability in &self.extension.capabilities {
            builder = builder.capability(CapabilitySet::new(capability));
        }
        Ok(builder.build())
    }

    fn validate(&self) -> Result<()> {
        let name = &self.extension.name;
        if name.trim().is_empty() {
            return Err(Error::InvalidName {
                name: name.clone(),
                reason: "extension name must not be empty".to_string(),
            });
        }
        // The name becomes a directory under the plugins folder.
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::InvalidName {
                name: name.clone(),
                reason: "extension name must not contain path separators".to_string(),
            });
        }
        if self.extension.version.trim().is_empty() {
            return Err(Error::InvalidManifest {
                reason: format!("extension '{name}' has an empty version"),
            });
        }
        for kind in [DependencyKind::Required, DependencyKind::Optional] {
            self.dependencies(kind).map_err(|e| Error::InvalidManifest {
                reason: format!("{kind} dependencies of '{name}': {e}"),
            })?;
        }
        Ok(())
    }
}
