// src/config/validate.rs

use globset::Glob;
use tracing::warn;

use crate::config::model::{RawRegistryFile, RegistryFile};
use crate::errors::{IvysnapError, Result};
use crate::registry::graph::find_cycle_in;

impl TryFrom<RawRegistryFile> for RegistryFile {
    type Error = crate::errors::IvysnapError;

    fn try_from(raw: RawRegistryFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_registry(&raw)?;
        Ok(RegistryFile::new_unchecked(raw.gate, raw.configuration))
    }
}

fn validate_raw_registry(cfg: &RawRegistryFile) -> Result<()> {
    ensure_has_configurations(cfg)?;
    validate_gate(cfg)?;
    validate_dependencies(cfg)?;
    warn_on_cycle(cfg);
    Ok(())
}

fn ensure_has_configurations(cfg: &RawRegistryFile) -> Result<()> {
    if cfg.configuration.is_empty() {
        return Err(IvysnapError::ConfigError(
            "registry must contain at least one [configuration.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_gate(cfg: &RawRegistryFile) -> Result<()> {
    let gate = &cfg.gate;

    if gate.descriptor_file_name.trim().is_empty() {
        return Err(IvysnapError::ConfigError(
            "[gate].descriptor_file_name must not be empty".to_string(),
        ));
    }

    Glob::new(&gate.artifact_pattern).map_err(|e| {
        IvysnapError::ConfigError(format!(
            "[gate].artifact_pattern '{}' is not a valid glob: {e}",
            gate.artifact_pattern
        ))
    })?;

    if gate.opt_in_key.is_empty() || gate.opt_out_key.is_empty() {
        return Err(IvysnapError::ConfigError(
            "[gate].opt_in_key and [gate].opt_out_key must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_dependencies(cfg: &RawRegistryFile) -> Result<()> {
    for (id, entry) in cfg.configuration.iter() {
        for dep in entry.dependencies.iter() {
            if !cfg.configuration.contains_key(dep) {
                return Err(IvysnapError::ConfigError(format!(
                    "configuration '{}' has unknown dependency '{}'",
                    id, dep
                )));
            }
            if dep == id {
                return Err(IvysnapError::ConfigError(format!(
                    "configuration '{}' cannot depend on itself",
                    id
                )));
            }
        }
    }
    Ok(())
}

/// Cycles are logged, never rejected. Reconciliation is allowed to write one.
fn warn_on_cycle(cfg: &RawRegistryFile) {
    let nodes = cfg.configuration.keys().map(String::as_str);
    let edges = cfg.configuration.iter().flat_map(|(id, entry)| {
        entry
            .dependencies
            .iter()
            .map(move |dep| (id.as_str(), dep.as_str()))
    });

    if let Some(node) = find_cycle_in(nodes, edges) {
        warn!(config = %node, "snapshot dependencies contain a cycle");
    }
}
