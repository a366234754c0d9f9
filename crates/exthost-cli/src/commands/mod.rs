//! Command implementations for exthost-cli

pub mod check;
pub mod list;

use std::fs;
use std::path::{Path, PathBuf};

use exthost_core::{ExtensionManifest, MANIFEST_FILENAME};

use crate::error::{CliError, Result};

pub use check::run_check;
pub use list::run_list;

/// Find the manifests under `dir`, sorted by path.
///
/// A manifest is any `*.toml` file directly in `dir`, or an
/// `extension.toml` in one of its immediate subdirectories.
pub fn discover_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::user(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut manifests = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            let nested = path.join(MANIFEST_FILENAME);
            if nested.is_file() {
                manifests.push(nested);
            }
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            manifests.push(path);
        }
    }
    manifests.sort();
    tracing::debug!(dir = %dir.display(), count = manifests.len(), "Discovered manifests");
    Ok(manifests)
}

/// Resolve `dir` and parse every manifest in it.
fn load_manifests(dir: &Path) -> Result<(PathBuf, Vec<(PathBuf, ExtensionManifest)>)> {
    let dir = dunce::canonicalize(dir)
        .map_err(|e| CliError::user(format!("Cannot open '{}': {e}", dir.display())))?;

    let manifests = discover_manifests(&dir)?
        .into_iter()
        .map(|path| {
            let manifest = ExtensionManifest::from_path(&path).map_err(|e| {
                CliError::user(format!(
                    "Invalid extension manifest '{}': {e}",
                    path.display()
                ))
            })?;
            Ok((path, manifest))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((dir, manifests))
}
