//! `exthost list`: show the manifests in a directory.

use std::path::Path;

use colored::Colorize;
use exthost_core::{DependencyKind, DependencySpec};

use super::load_manifests;
use crate::error::Result;

/// Handle `exthost list [DIR]`
pub fn run_list(dir: &Path) -> Result<()> {
    let (dir, manifests) = load_manifests(dir)?;
    if manifests.is_empty() {
        println!("No extension manifests found in {}", dir.display());
        return Ok(());
    }

    println!("{}", "Extensions".bold());
    for (_, manifest) in &manifests {
        println!("  {} v{}", manifest.name().cyan(), manifest.version());
        if let Some(description) = &manifest.extension.description {
            println!("    {}", description.dimmed());
        }
        if !manifest.extension.capabilities.is_empty() {
            println!(
                "    {} {}",
                "exports:".dimmed(),
                manifest.extension.capabilities.join(", ")
            );
        }
        for kind in [DependencyKind::Required, DependencyKind::Optional] {
            let spec = manifest.dependencies(kind)?;
            if !spec.is_empty() {
                println!("    {} {}", format!("{kind}:").dimmed(), describe(&spec));
            }
        }
    }
    Ok(())
}

/// `Core [Helpers, Utils], Stats`
fn describe(spec: &DependencySpec) -> String {
    spec.iter()
        .map(|dependency| {
            let included = dependency.options.included();
            if included.is_empty() {
                dependency.name.clone()
            } else {
                format!("{} [{}]", dependency.name, included.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
