// src/gate/report.rs

use std::fmt;

use crate::registry::ConfigId;

/// What happened to one changed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Old and new content are byte-identical.
    Unchanged,
    /// Old or new content is missing or cannot be parsed.
    Malformed(String),
    /// No configuration currently publishes the old descriptor.
    OwnerNotFound,
    /// Owner found, but it has not opted in; edges left untouched.
    NotOptedIn {
        owner: ConfigId,
        would_depend_on: Vec<ConfigId>,
    },
    Reconciled {
        owner: ConfigId,
        removed: Vec<ConfigId>,
        added: Vec<ConfigId>,
        /// Matching configurations skipped because they opted out.
        opted_out: Vec<ConfigId>,
    },
    /// The registry rejected an operation.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of one change set, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateReport {
    pub files: Vec<FileReport>,
}

impl GateReport {
    /// Owners whose edges were rewritten.
    pub fn reconciled_owners(&self) -> impl Iterator<Item = &str> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Reconciled { owner, .. } => Some(owner.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Unchanged => write!(f, "unchanged"),
            FileOutcome::Malformed(reason) => write!(f, "malformed: {reason}"),
            FileOutcome::OwnerNotFound => write!(f, "no owning configuration"),
            FileOutcome::NotOptedIn {
                owner,
                would_depend_on,
            } => write!(
                f,
                "{owner} has not opted in (would depend on {:?})",
                would_depend_on
            ),
            FileOutcome::Reconciled {
                owner,
                added,
                opted_out,
                ..
            } => {
                write!(f, "{owner} now depends on {:?}", added)?;
                if !opted_out.is_empty() {
                    write!(f, " (opted out: {:?})", opted_out)?;
                }
                Ok(())
            }
            FileOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
