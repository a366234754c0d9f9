//! `exthost check`: run every extension in a directory through the
//! lifecycle and report which ones could not be enabled.

use std::path::Path;

use colored::Colorize;
use exthost_core::{ExtensionHost, LifecycleState};

use super::load_manifests;
use crate::error::{CliError, Result};

/// Handle `exthost check [DIR] [--disable]`
///
/// Every manifest is defined and constructed before any extension is loaded.
/// All extensions are loaded, then each is enabled in path order.
pub fn run_check(dir: &Path, disable: bool) -> Result<()> {
    let (dir, manifests) = load_manifests(dir)?;
    if manifests.is_empty() {
        println!(
            "{} No extension manifests found in {}",
            "=>".yellow().bold(),
            dir.display()
        );
        return Ok(());
    }

    let mut host = ExtensionHost::new();
    let mut ids = Vec::with_capacity(manifests.len());
    for (path, manifest) in &manifests {
        let kind = host.define(manifest.to_definition()?);
        ids.push(host.construct(path, kind)?);
    }

    for &id in &ids {
        host.load(id)?;
    }

    let mut failed = Vec::new();
    for &id in &ids {
        if let Err(e) = host.enable(id) {
            let name = host.description(id)?.name().to_string();
            tracing::debug!(extension = %name, error = %e, "Enable failed");
            println!("{} {}: {}", "FAIL".red().bold(), name.cyan(), e);
            failed.push(name);
        }
    }

    if disable {
        for &id in &ids {
            if host.state(id)? == LifecycleState::Enabled {
                host.disable(id)?;
            }
        }
    }

    let enabled = ids.len() - failed.len();
    println!();
    println!(
        "{} {}, {}",
        "Summary:".bold(),
        format!("{enabled} enabled").green(),
        if failed.is_empty() {
            "0 failed".normal()
        } else {
            format!("{} failed", failed.len()).red()
        }
    );

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} extension(s) failed to enable: {}",
            failed.len(),
            failed.join(", ")
        )))
    }
}
