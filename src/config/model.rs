// src/config/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ARTIFACT_PATTERN, DESCRIPTOR_FILE_NAME, OPT_IN_KEY, OPT_OUT_KEY, PolicyKeys};

/// Registry snapshot as read from a TOML file, before validation.
///
/// ```toml
/// [gate]
/// descriptor_file_name = "ivy.xml"
///
/// [configuration.App]
/// name = "App :: Build"
/// artifacts = "artifacts/App"
/// dependencies = ["Lib"]
///
/// [configuration.App.parameters]
/// AutoSetSnapshotDependenciesFromIvy = "true"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRegistryFile {
    /// Change gate behaviour from `[gate]`.
    #[serde(default)]
    pub gate: GateSection,

    /// All configurations from `[configuration.<id>]`, keyed by id.
    #[serde(default)]
    pub configuration: BTreeMap<String, ConfigurationEntry>,
}

/// Validated registry snapshot.
///
/// Only constructed through `TryFrom<RawRegistryFile>` (see `validate.rs`),
/// so every dependency points to a known configuration and the existing
/// edges form a DAG.
#[derive(Debug, Clone)]
pub struct RegistryFile {
    gate: GateSection,
    configuration: BTreeMap<String, ConfigurationEntry>,
}

impl RegistryFile {
    pub(crate) fn new_unchecked(
        gate: GateSection,
        configuration: BTreeMap<String, ConfigurationEntry>,
    ) -> Self {
        Self {
            gate,
            configuration,
        }
    }

    pub fn gate(&self) -> &GateSection {
        &self.gate
    }

    pub fn configurations(&self) -> &BTreeMap<String, ConfigurationEntry> {
        &self.configuration
    }

    pub fn into_raw(self) -> RawRegistryFile {
        RawRegistryFile {
            gate: self.gate,
            configuration: self.configuration,
        }
    }
}

/// `[gate]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GateSection {
    /// Suffix that marks a changed VCS path as a descriptor.
    #[serde(default = "default_descriptor_file_name")]
    pub descriptor_file_name: String,

    /// Glob matched against artifact paths to find a published descriptor.
    #[serde(default = "default_artifact_pattern")]
    pub artifact_pattern: String,

    #[serde(default = "default_opt_in_key")]
    pub opt_in_key: String,

    #[serde(default = "default_opt_out_key")]
    pub opt_out_key: String,
}

fn default_descriptor_file_name() -> String {
    DESCRIPTOR_FILE_NAME.to_string()
}

fn default_artifact_pattern() -> String {
    ARTIFACT_PATTERN.to_string()
}

fn default_opt_in_key() -> String {
    OPT_IN_KEY.to_string()
}

fn default_opt_out_key() -> String {
    OPT_OUT_KEY.to_string()
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            descriptor_file_name: default_descriptor_file_name(),
            artifact_pattern: default_artifact_pattern(),
            opt_in_key: default_opt_in_key(),
            opt_out_key: default_opt_out_key(),
        }
    }
}

impl GateSection {
    pub fn policy_keys(&self) -> PolicyKeys {
        PolicyKeys {
            opt_in: self.opt_in_key.clone(),
            opt_out: self.opt_out_key.clone(),
        }
    }
}

/// `[configuration.<id>]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigurationEntry {
    /// Display name used in logs; falls back to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Directory holding the latest finished build's artifacts, relative to
    /// the registry file. `None` means the configuration was never built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<String>,

    /// Outgoing snapshot dependencies (target ids), in insertion order.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Configuration parameters; only key presence matters for policy.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}
