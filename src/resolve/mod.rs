// src/resolve/mod.rs

//! Dependency resolution.
//!
//! Given a changed descriptor (before and after the change) and the current
//! descriptor of every configuration, work out which configuration owns the
//! change and which configurations the new descriptor depends on.

use tracing::{debug, info};

use crate::descriptor::Descriptor;
use crate::errors::{IvysnapError, Result};
use crate::registry::ConfigId;

/// A configuration together with the descriptor it currently publishes.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub config: ConfigId,
    pub descriptor: Descriptor,
    /// The configuration carries the opt-out parameter.
    pub opted_out: bool,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub owner: ConfigId,
    /// Configurations the owner should depend on, in candidate order.
    pub depends_on: Vec<ConfigId>,
    /// Configurations that would qualify but opted out.
    pub opted_out: Vec<ConfigId>,
}

/// Resolve the owner of `old` and the dependency set declared by `new`.
///
/// The owner is the first candidate whose identity equals `old`'s. Any
/// candidate with that identity is never tested as a dependency, so the
/// owner cannot end up depending on itself.
pub fn resolve(old: &Descriptor, new: &Descriptor, candidates: &[Candidate]) -> Result<Resolution> {
    let mut owner: Option<&ConfigId> = None;
    let mut depends_on = Vec::new();
    let mut opted_out = Vec::new();

    for candidate in candidates {
        if candidate.descriptor.identity() == old.identity() {
            match owner {
                None => {
                    info!(owner = %candidate.config, "changed descriptor corresponds to configuration");
                    owner = Some(&candidate.config);
                }
                Some(first) => {
                    debug!(config = %candidate.config, owner = %first, "another configuration publishes the same descriptor, keeping the first");
                }
            }
            continue;
        }

        if !new.depends_on(&candidate.descriptor) {
            continue;
        }

        if candidate.opted_out {
            info!(config = %candidate.config, "would depend on configuration but it has disabled auto dependencies");
            push_unique(&mut opted_out, &candidate.config);
        } else {
            info!(config = %candidate.config, "detected a dependency on configuration");
            push_unique(&mut depends_on, &candidate.config);
        }
    }

    let Some(owner) = owner else {
        let id = old.identity();
        return Err(IvysnapError::OwnerNotFound(format!(
            "{}#{};{} (branch {})",
            id.organisation, id.module, id.revision, id.branch
        )));
    };

    Ok(Resolution {
        owner: owner.clone(),
        depends_on,
        opted_out,
    })
}

fn push_unique(list: &mut Vec<ConfigId>, config: &ConfigId) {
    if !list.contains(config) {
        list.push(config.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DependencyDeclaration, DescriptorIdentity};

    fn lib(module: &str, rev: &str) -> Descriptor {
        Descriptor::new(DescriptorIdentity::new("MyOrg", module, rev), vec![])
    }

    fn app(deps: Vec<DependencyDeclaration>) -> Descriptor {
        Descriptor::new(
            DescriptorIdentity::new("MyOrg", "App", "2.0").with_branch("stable"),
            deps,
        )
    }

    fn candidate(config: &str, descriptor: Descriptor, opted_out: bool) -> Candidate {
        Candidate {
            config: config.to_string(),
            descriptor,
            opted_out,
        }
    }

    fn declarations(rev: &str) -> Vec<DependencyDeclaration> {
        vec![
            DependencyDeclaration::new("MyOrg", "AnotherLib", "1.+", "stable"),
            DependencyDeclaration::new("MyOrg", "MyLibrary", rev, "trunk"),
        ]
    }

    #[test]
    fn library_matching_declaration_is_included() {
        let old = app(vec![]);
        let new = app(declarations("1.+"));
        let candidates = vec![
            candidate("AppBuild", app(vec![]), false),
            candidate("LibBuild", lib("MyLibrary", "1.0.4.2332"), false),
        ];

        let r = resolve(&old, &new, &candidates).unwrap();
        assert_eq!(r.owner, "AppBuild");
        assert_eq!(r.depends_on, vec!["LibBuild"]);
        assert!(r.opted_out.is_empty());
    }

    #[test]
    fn library_failing_constraint_is_excluded() {
        let old = app(vec![]);
        let new = app(declarations("0.+"));
        let candidates = vec![
            candidate("AppBuild", app(vec![]), false),
            candidate("LibBuild", lib("MyLibrary", "1.0.4.2332"), false),
        ];

        let r = resolve(&old, &new, &candidates).unwrap();
        assert!(r.depends_on.is_empty());
    }

    #[test]
    fn owner_not_found() {
        let old = app(vec![]);
        let new = app(declarations("1.+"));
        let candidates = vec![candidate("LibBuild", lib("MyLibrary", "1.0"), false)];

        match resolve(&old, &new, &candidates) {
            Err(IvysnapError::OwnerNotFound(msg)) => assert!(msg.contains("MyOrg#App;2.0")),
            other => panic!("expected OwnerNotFound, got {other:?}"),
        }
    }

    #[test]
    fn opted_out_candidate_is_reported_not_included() {
        let old = app(vec![]);
        let new = app(declarations("1.+"));
        let candidates = vec![
            candidate("LibBuild", lib("MyLibrary", "1.0"), true),
            candidate("AppBuild", app(vec![]), false),
        ];

        let r = resolve(&old, &new, &candidates).unwrap();
        assert!(r.depends_on.is_empty());
        assert_eq!(r.opted_out, vec!["LibBuild"]);
    }

    #[test]
    fn first_identical_descriptor_wins_and_none_become_dependencies() {
        let old = app(vec![]);
        // new declares a dependency on its own module
        let new = app(vec![DependencyDeclaration::new("MyOrg", "App", ".*", "stable")]);
        let candidates = vec![
            candidate("First", app(vec![]), false),
            candidate("Second", app(vec![]), false),
        ];

        let r = resolve(&old, &new, &candidates).unwrap();
        assert_eq!(r.owner, "First");
        assert!(r.depends_on.is_empty());
    }

    #[test]
    fn owner_change_in_revision_does_not_self_loop() {
        let old = app(vec![]);
        let mut id = old.identity().clone();
        id.revision = "2.1".to_string();
        let new = Descriptor::new(id, vec![DependencyDeclaration::new("MyOrg", "App", "2.+", "stable")]);
        let candidates = vec![candidate("AppBuild", app(vec![]), false)];

        let r = resolve(&old, &new, &candidates).unwrap();
        assert_eq!(r.owner, "AppBuild");
        assert!(!r.depends_on.contains(&"AppBuild".to_string()));
    }

    #[test]
    fn dependencies_keep_candidate_order() {
        let old = app(vec![]);
        let new = app(vec![
            DependencyDeclaration::new("MyOrg", "B", ".*", "trunk"),
            DependencyDeclaration::new("MyOrg", "A", ".*", "trunk"),
        ]);
        let candidates = vec![
            candidate("ABuild", lib("A", "1"), false),
            candidate("AppBuild", app(vec![]), false),
            candidate("BBuild", lib("B", "1"), false),
        ];

        let r = resolve(&old, &new, &candidates).unwrap();
        assert_eq!(r.depends_on, vec!["ABuild", "BBuild"]);
    }
}
