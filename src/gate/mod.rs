// src/gate/mod.rs

//! Change gate: turns a VCS change set into reconciled snapshot dependencies.
//!
//! For every changed descriptor file the gate:
//! 1. skips it if the content did not actually change,
//! 2. parses the old and new content,
//! 3. loads the current descriptor of every configuration from the
//!    artifact store,
//! 4. resolves the owner and its dependency set ([`crate::resolve`]),
//! 5. reconciles the owner's edges ([`crate::reconcile`]).
//!
//! Nothing here is fatal: each file ends up as one [`FileOutcome`] in the
//! returned [`GateReport`] and processing moves on to the next file.

pub mod report;

use globset::{Glob, GlobMatcher};
use tracing::{debug, error, info, warn};

use crate::artifacts::{self, ArtifactStore};
use crate::config::model::GateSection;
use crate::descriptor::{self, Descriptor};
use crate::errors::{IvysnapError, Result};
use crate::reconcile::{self, ReconcileOutcome};
use crate::registry::ConfigurationRegistry;
use crate::resolve::{self, Candidate};
use crate::types::PolicyKeys;

pub use report::{FileOutcome, FileReport, GateReport};

/// One file-level modification inside a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the VCS root.
    pub path: String,
    /// Content before the change; `None` if the file was added.
    pub before: Option<Vec<u8>>,
    /// Content after the change; `None` if the file was deleted.
    pub after: Option<Vec<u8>>,
}

/// All file changes of one notification, in delivery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub changes: Vec<FileChange>,
}

/// Compiled gate behaviour.
#[derive(Debug, Clone)]
pub struct ChangeGate {
    descriptor_file_name: String,
    artifact_pattern: GlobMatcher,
    keys: PolicyKeys,
}

impl ChangeGate {
    pub fn new(settings: &GateSection) -> Result<Self> {
        let glob = Glob::new(&settings.artifact_pattern).map_err(|e| {
            IvysnapError::ConfigError(format!(
                "invalid artifact pattern '{}': {e}",
                settings.artifact_pattern
            ))
        })?;

        Ok(Self {
            descriptor_file_name: settings.descriptor_file_name.clone(),
            artifact_pattern: glob.compile_matcher(),
            keys: settings.policy_keys(),
        })
    }

    /// Whether a changed VCS path is a descriptor this gate cares about.
    pub fn is_descriptor_path(&self, path: &str) -> bool {
        path.ends_with(&self.descriptor_file_name)
    }

    /// Handle one change notification.
    ///
    /// Changes are processed one at a time, each fully resolved and
    /// reconciled before the next.
    pub fn on_change_set(
        &self,
        change_set: &ChangeSet,
        registry: &mut dyn ConfigurationRegistry,
        artifacts: &dyn ArtifactStore,
    ) -> GateReport {
        info!(files = change_set.changes.len(), "change detected");
        let mut report = GateReport::default();

        for change in &change_set.changes {
            if !self.is_descriptor_path(&change.path) {
                continue;
            }
            info!(path = %change.path, "change detected in descriptor");

            let outcome = self.process_change(change, registry, artifacts);
            report.files.push(FileReport {
                path: change.path.clone(),
                outcome,
            });
        }

        report
    }

    fn process_change(
        &self,
        change: &FileChange,
        registry: &mut dyn ConfigurationRegistry,
        artifacts: &dyn ArtifactStore,
    ) -> FileOutcome {
        if change.before == change.after {
            debug!(path = %change.path, "descriptor content is unchanged");
            return FileOutcome::Unchanged;
        }

        let (old, new) = match parse_both(change) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(path = %change.path, error = %err, "cannot parse changed descriptor");
                return FileOutcome::Malformed(err.to_string());
            }
        };

        let candidates = self.load_candidates(&*registry, artifacts);

        let resolution = match resolve::resolve(&old, &new, &candidates) {
            Ok(r) => r,
            Err(IvysnapError::OwnerNotFound(what)) => {
                info!(path = %change.path, descriptor = %what, "could not identify the owning configuration");
                return FileOutcome::OwnerNotFound;
            }
            Err(err) => {
                error!(path = %change.path, error = %err, "dependency resolution failed");
                return FileOutcome::Failed(err.to_string());
            }
        };

        match reconcile::reconcile(registry, &self.keys, &resolution.owner, &resolution.depends_on) {
            Ok(ReconcileOutcome::Skipped) => FileOutcome::NotOptedIn {
                owner: resolution.owner,
                would_depend_on: resolution.depends_on,
            },
            Ok(ReconcileOutcome::Reconciled { removed, added }) => FileOutcome::Reconciled {
                owner: resolution.owner,
                removed,
                added,
                opted_out: resolution.opted_out,
            },
            Err(err) => {
                error!(owner = %resolution.owner, error = %err, "reconciliation failed");
                FileOutcome::Failed(err.to_string())
            }
        }
    }

    /// Current descriptor of every configuration that has one.
    ///
    /// Configurations whose artifacts cannot be listed are logged and left
    /// out of this pass.
    fn load_candidates(
        &self,
        registry: &dyn ConfigurationRegistry,
        artifacts: &dyn ArtifactStore,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for config in registry.active_configurations() {
            match artifacts::current_descriptor(artifacts, &config, &self.artifact_pattern) {
                Ok(Some(descriptor)) => {
                    let opted_out = registry.has_parameter(&config, &self.keys.opt_out);
                    candidates.push(Candidate {
                        config,
                        descriptor,
                        opted_out,
                    });
                }
                Ok(None) => debug!(config = %config, "configuration has no published descriptor"),
                Err(err) => warn!(config = %config, error = %err, "skipping configuration"),
            }
        }

        candidates
    }
}

fn parse_both(change: &FileChange) -> Result<(Descriptor, Descriptor)> {
    let old = parse_half(change.before.as_deref(), "before")?;
    let new = parse_half(change.after.as_deref(), "after")?;
    Ok((old, new))
}

fn parse_half(content: Option<&[u8]>, which: &str) -> Result<Descriptor> {
    let bytes = content.ok_or_else(|| {
        IvysnapError::MalformedDescriptor(format!("no content {which} the change"))
    })?;
    descriptor::parse(bytes)
}
