// src/reconcile/mod.rs

//! Reconciliation of an owner's snapshot dependencies.
//!
//! This is the only place that mutates the configuration registry. The
//! update is a full replace: every current edge of the owner is removed and
//! one edge per target is added back, then the owner is persisted once.
//! Unchanged edges are recreated too, so edge identities are not stable
//! across reconciliations even when the target set is.
//!
//! There is no rollback. If the registry rejects a remove or an add, the
//! error is returned as is: edges removed so far stay removed, edges added
//! so far stay added, and `persist` is not called.

use tracing::{info, warn};

use crate::errors::Result;
use crate::registry::{ConfigId, ConfigurationRegistry, find_cycle};
use crate::types::PolicyKeys;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The owner has not opted in; nothing was touched.
    Skipped,
    Reconciled {
        /// Targets of the edges that were removed.
        removed: Vec<ConfigId>,
        /// Targets of the edges that were added.
        added: Vec<ConfigId>,
    },
}

pub fn reconcile(
    registry: &mut dyn ConfigurationRegistry,
    keys: &PolicyKeys,
    owner: &str,
    depends_on: &[ConfigId],
) -> Result<ReconcileOutcome> {
    if !registry.has_parameter(owner, &keys.opt_in) {
        info!(owner = %owner, key = %keys.opt_in, "configuration has not opted in for automatic dependency management");
        return Ok(ReconcileOutcome::Skipped);
    }

    info!(owner = %owner, "removing dependencies");
    let mut removed = Vec::new();
    for edge in registry.dependencies(owner)? {
        registry.remove_dependency(owner, &edge)?;
        removed.push(edge.target);
    }

    let mut added = Vec::new();
    for target in depends_on {
        if target == owner {
            warn!(owner = %owner, "refusing to add a dependency on itself");
            continue;
        }
        if registry.has_parameter(target, &keys.opt_out) {
            info!(owner = %owner, target = %target, "target has disabled auto dependencies, not adding");
            continue;
        }
        info!(owner = %owner, target = %registry.display_name(target), "adding dependency");
        registry.add_dependency(owner, target)?;
        added.push(target.clone());
    }

    registry.persist(owner)?;

    if let Some(node) = find_cycle(&*registry)? {
        warn!(owner = %owner, config = %node, "snapshot dependencies now contain a cycle");
    }

    Ok(ReconcileOutcome::Reconciled { removed, added })
}
