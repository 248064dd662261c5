// src/descriptor/model.rs

use crate::descriptor::revision;

/// Branch assumed when a descriptor or dependency does not declare one.
pub const DEFAULT_BRANCH: &str = "trunk";

/// Status assumed when `<info>` does not declare one.
pub const DEFAULT_STATUS: &str = "integration";

/// The `<info>` part of a descriptor.
///
/// Two identities are equal when all five fields are pairwise equal. This is
/// only used to find the configuration that published the pre-change
/// descriptor; dependency matching goes through [`Descriptor::depends_on`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorIdentity {
    pub organisation: String,
    pub module: String,
    pub branch: String,
    pub status: String,
    pub revision: String,
}

impl DescriptorIdentity {
    /// Identity with the default branch and status.
    pub fn new(
        organisation: impl Into<String>,
        module: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            organisation: organisation.into(),
            module: module.into(),
            branch: DEFAULT_BRANCH.to_string(),
            status: DEFAULT_STATUS.to_string(),
            revision: revision.into(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// One `<dependency org=".." name=".." rev=".." branch=".."/>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    pub organisation: String,
    pub name: String,
    /// Revision constraint, interpreted as a regular expression.
    pub rev: String,
    pub branch: String,
}

impl DependencyDeclaration {
    pub fn new(
        organisation: impl Into<String>,
        name: impl Into<String>,
        rev: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            organisation: organisation.into(),
            name: name.into(),
            rev: rev.into(),
            branch: branch.into(),
        }
    }

    /// Whether `target` (another module's current descriptor) satisfies
    /// this declaration.
    pub fn is_satisfied_by(&self, target: &DescriptorIdentity) -> bool {
        target.organisation == self.organisation
            && target.module == self.name
            && target.branch == self.branch
            && revision::matches(&target.revision, &self.rev)
    }
}

/// Structured, immutable form of an Ivy descriptor.
///
/// A descriptor is built once per parse and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Descriptor {
    identity: DescriptorIdentity,
    dependencies: Vec<DependencyDeclaration>,
}

impl Descriptor {
    pub fn new(identity: DescriptorIdentity, dependencies: Vec<DependencyDeclaration>) -> Self {
        Self {
            identity,
            dependencies,
        }
    }

    pub fn identity(&self) -> &DescriptorIdentity {
        &self.identity
    }

    /// Declared dependencies, in source order.
    pub fn dependencies(&self) -> &[DependencyDeclaration] {
        &self.dependencies
    }

    /// True if any of this descriptor's declarations is satisfied by `target`.
    pub fn depends_on(&self, target: &Descriptor) -> bool {
        self.dependencies
            .iter()
            .any(|dep| dep.is_satisfied_by(&target.identity))
    }
}
