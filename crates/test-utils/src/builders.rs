#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use ivysnap::artifacts::DirArtifactStore;
use ivysnap::fs::mock::MockFileSystem;
use ivysnap::gate::{ChangeSet, FileChange};
use ivysnap::registry::InMemoryRegistry;
use ivysnap::types::{OPT_IN_KEY, OPT_OUT_KEY};

/// Builder for `ivy.xml` documents.
#[derive(Debug, Clone)]
pub struct DescriptorXml {
    organisation: String,
    module: String,
    revision: String,
    branch: Option<String>,
    status: Option<String>,
    dependencies: Vec<(String, String, String, Option<String>)>,
}

impl DescriptorXml {
    pub fn new(organisation: &str, module: &str, revision: &str) -> Self {
        Self {
            organisation: organisation.to_string(),
            module: module.to_string(),
            revision: revision.to_string(),
            branch: None,
            status: None,
            dependencies: Vec::new(),
        }
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn revision(mut self, revision: &str) -> Self {
        self.revision = revision.to_string();
        self
    }

    /// Add a dependency without a `branch` attribute.
    pub fn depends(mut self, org: &str, name: &str, rev: &str) -> Self {
        self.dependencies
            .push((org.to_string(), name.to_string(), rev.to_string(), None));
        self
    }

    pub fn depends_on_branch(mut self, org: &str, name: &str, rev: &str, branch: &str) -> Self {
        self.dependencies.push((
            org.to_string(),
            name.to_string(),
            rev.to_string(),
            Some(branch.to_string()),
        ));
        self
    }

    pub fn build(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ivy-module version=\"2.0\">\n");
        xml.push_str(&format!(
            "  <info organisation=\"{}\" module=\"{}\" revision=\"{}\"",
            self.organisation, self.module, self.revision
        ));
        if let Some(b) = &self.branch {
            xml.push_str(&format!(" branch=\"{b}\""));
        }
        if let Some(s) = &self.status {
            xml.push_str(&format!(" status=\"{s}\""));
        }
        xml.push_str("/>\n  <dependencies>\n");
        for (org, name, rev, branch) in &self.dependencies {
            xml.push_str(&format!("    <dependency org=\"{org}\" name=\"{name}\" rev=\"{rev}\""));
            if let Some(b) = branch {
                xml.push_str(&format!(" branch=\"{b}\""));
            }
            xml.push_str("/>\n");
        }
        xml.push_str("  </dependencies>\n</ivy-module>\n");
        xml
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.build().into_bytes()
    }
}

/// Builder for an in-memory registry plus a matching artifact store.
///
/// Configurations are enumerated in the order they are added.
pub struct RegistryBuilder {
    fs: MockFileSystem,
    registry: InMemoryRegistry,
    dirs: Vec<(String, PathBuf)>,
    current: Option<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
            registry: InMemoryRegistry::new(),
            dirs: Vec::new(),
            current: None,
        }
    }

    /// Start a new configuration; following calls apply to it.
    pub fn config(mut self, id: &str) -> Self {
        self.registry.add_configuration(id, BTreeMap::new());
        self.current = Some(id.to_string());
        self
    }

    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        let id = self.current_id();
        self.registry
            .set_parameter(&id, key, value)
            .expect("configuration was added by this builder");
        self
    }

    pub fn opt_in(self) -> Self {
        self.parameter(OPT_IN_KEY, "true")
    }

    pub fn opt_out(self) -> Self {
        self.parameter(OPT_OUT_KEY, "true")
    }

    /// Publish an artifact in this configuration's latest build.
    pub fn artifact(mut self, relative_path: &str, content: impl Into<Vec<u8>>) -> Self {
        let id = self.current_id();
        let dir = PathBuf::from("builds").join(&id);
        self.fs.add_file(dir.join(relative_path), content);
        if !self.dirs.iter().any(|(c, _)| c == &id) {
            self.dirs.push((id, dir));
        }
        self
    }

    /// Publish `descriptor` as `ivy.xml` in this configuration's latest build.
    pub fn publishes(self, descriptor: &DescriptorXml) -> Self {
        self.artifact("ivy.xml", descriptor.bytes())
    }

    /// Add an existing dependency edge from the current configuration.
    pub fn edge_to(mut self, target: &str) -> Self {
        use ivysnap::registry::ConfigurationRegistry;
        let id = self.current_id();
        self.registry
            .add_dependency(&id, target)
            .expect("target must be added before edge_to");
        self
    }

    pub fn build(self) -> (InMemoryRegistry, DirArtifactStore<MockFileSystem>) {
        let mut store = DirArtifactStore::new(self.fs);
        for (id, dir) in self.dirs {
            store = store.with_dir(id, dir);
        }
        (self.registry, store)
    }

    fn current_id(&self) -> String {
        self.current
            .clone()
            .expect("call config(..) before configuring it")
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A change set with a single modified descriptor.
pub fn descriptor_change(path: &str, before: &DescriptorXml, after: &DescriptorXml) -> ChangeSet {
    ChangeSet {
        changes: vec![FileChange {
            path: path.to_string(),
            before: Some(before.bytes()),
            after: Some(after.bytes()),
        }],
    }
}
