// src/lib.rs

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod fs;
pub mod gate;
pub mod logging;
pub mod reconcile;
pub mod registry;
pub mod resolve;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::artifacts::DirArtifactStore;
use crate::cli::CliArgs;
use crate::config::loader::{load_and_validate, save_registry};
use crate::config::load_change_set;
use crate::fs::RealFileSystem;
use crate::gate::{ChangeGate, GateReport};
use crate::registry::{ConfigurationRegistry, InMemoryRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - registry snapshot loading
/// - the directory-backed artifact store
/// - change set loading
/// - the change gate
/// - writing the registry back (unless `--dry-run`)
pub fn run(args: CliArgs) -> Result<()> {
    let registry_path = PathBuf::from(&args.registry);
    let snapshot = load_and_validate(&registry_path)?;

    let root_dir = snapshot_root_dir(&registry_path);
    let artifacts = DirArtifactStore::from_registry(RealFileSystem, &root_dir, &snapshot);
    let mut registry = InMemoryRegistry::from_registry_file(&snapshot)?;

    let change_set = load_change_set(&RealFileSystem, Path::new(&args.changes))?;
    info!(changes = change_set.changes.len(), "replaying change set");

    let gate = ChangeGate::new(snapshot.gate())?;
    let report = gate.on_change_set(&change_set, &mut registry, &artifacts);

    print_report(&report, &registry);

    if args.dry_run {
        debug!("dry-run: registry not written");
        return Ok(());
    }

    if registry.persisted().is_empty() {
        debug!("no configuration persisted, registry left as is");
        return Ok(());
    }

    let updated = registry.to_registry_file(snapshot.gate().clone());
    save_registry(&RealFileSystem, &registry_path, &updated)?;
    info!(path = ?registry_path, "registry written");
    Ok(())
}

/// Directory that `artifacts = "..."` paths are relative to.
///
/// - A registry path with a non-empty parent (e.g. "ci/Registry.toml") uses
///   that directory.
/// - A bare filename like "Registry.toml" (parent = "") falls back to the
///   current working directory.
fn snapshot_root_dir(registry_path: &Path) -> PathBuf {
    match registry_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn print_report(report: &GateReport, registry: &InMemoryRegistry) {
    println!("ivysnap report");
    if report.files.is_empty() {
        println!("  no descriptor changes");
        return;
    }

    for file in &report.files {
        println!("  - {}: {}", file.path, file.outcome);
    }

    let owners: Vec<&str> = report.reconciled_owners().collect();
    if owners.is_empty() {
        return;
    }

    println!();
    println!("snapshot dependencies:");
    for owner in owners {
        println!(
            "  {} -> {:?}",
            registry.display_name(owner),
            registry.targets_of(owner)
        );
    }
}
