// src/registry/memory.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::model::{ConfigurationEntry, GateSection, RegistryFile};
use crate::errors::{IvysnapError, Result};
use crate::registry::{ConfigId, ConfigurationRegistry, DependencyEdge, EdgeId};

#[derive(Debug, Clone)]
struct ConfigNode {
    id: ConfigId,
    name: Option<String>,
    artifacts: Option<String>,
    parameters: BTreeMap<String, String>,
    edges: Vec<DependencyEdge>,
}

/// In-memory registry with a fixed enumeration order.
///
/// Every added edge gets a fresh id, so an edge that is removed and added
/// again is observably a new edge. `persist` only records the call; the
/// host writes the snapshot out via [`InMemoryRegistry::to_registry_file`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    nodes: Vec<ConfigNode>,
    next_edge_id: EdgeId,
    persisted: Vec<ConfigId>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configuration at the end of the enumeration order.
    pub fn add_configuration(
        &mut self,
        id: impl Into<ConfigId>,
        parameters: BTreeMap<String, String>,
    ) -> &mut Self {
        self.nodes.push(ConfigNode {
            id: id.into(),
            name: None,
            artifacts: None,
            parameters,
            edges: Vec::new(),
        });
        self
    }

    /// Build from a validated snapshot, keeping its (sorted) key order.
    pub fn from_registry_file(file: &RegistryFile) -> Result<Self> {
        let mut registry = Self::new();
        for (id, entry) in file.configurations() {
            registry.add_configuration(id.clone(), entry.parameters.clone());
            if let Some(node) = registry.nodes.last_mut() {
                node.name = entry.name.clone();
                node.artifacts = entry.artifacts.clone();
            }
        }
        for (id, entry) in file.configurations() {
            for dep in &entry.dependencies {
                registry.push_edge(id, dep)?;
            }
        }
        Ok(registry)
    }

    /// Convert back into a snapshot, using `gate` as the `[gate]` section.
    pub fn to_registry_file(&self, gate: GateSection) -> RegistryFile {
        let configuration = self
            .nodes
            .iter()
            .map(|node| {
                let entry = ConfigurationEntry {
                    name: node.name.clone(),
                    artifacts: node.artifacts.clone(),
                    dependencies: node.edges.iter().map(|e| e.target.clone()).collect(),
                    parameters: node.parameters.clone(),
                };
                (node.id.clone(), entry)
            })
            .collect();

        RegistryFile::new_unchecked(gate, configuration)
    }

    /// Configurations `persist` was called for, in call order.
    pub fn persisted(&self) -> &[ConfigId] {
        &self.persisted
    }

    /// Target ids of `config`'s current edges.
    pub fn targets_of(&self, config: &str) -> Vec<ConfigId> {
        self.node(config)
            .map(|n| n.edges.iter().map(|e| e.target.clone()).collect())
            .unwrap_or_default()
    }

    pub fn set_parameter(&mut self, config: &str, key: &str, value: &str) -> Result<()> {
        let node = self.node_mut(config)?;
        node.parameters.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn node(&self, config: &str) -> Option<&ConfigNode> {
        self.nodes.iter().find(|n| n.id == config)
    }

    fn node_mut(&mut self, config: &str) -> Result<&mut ConfigNode> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == config)
            .ok_or_else(|| unknown(config))
    }

    fn push_edge(&mut self, config: &str, target: &str) -> Result<DependencyEdge> {
        if self.node(target).is_none() {
            return Err(unknown(target));
        }
        let id = self.next_edge_id;
        let node = self.node_mut(config)?;
        let edge = DependencyEdge {
            id,
            source: config.to_string(),
            target: target.to_string(),
        };
        node.edges.push(edge.clone());
        self.next_edge_id += 1;
        Ok(edge)
    }
}

fn unknown(config: &str) -> IvysnapError {
    IvysnapError::ConfigError(format!("unknown configuration '{config}'"))
}

impl ConfigurationRegistry for InMemoryRegistry {
    fn active_configurations(&self) -> Vec<ConfigId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn has_parameter(&self, config: &str, key: &str) -> bool {
        self.node(config)
            .is_some_and(|n| n.parameters.contains_key(key))
    }

    fn dependencies(&self, config: &str) -> Result<Vec<DependencyEdge>> {
        self.node(config)
            .map(|n| n.edges.clone())
            .ok_or_else(|| unknown(config))
    }

    fn add_dependency(&mut self, config: &str, target: &str) -> Result<DependencyEdge> {
        let edge = self.push_edge(config, target)?;
        debug!(source = %config, target = %target, edge = edge.id, "added dependency edge");
        Ok(edge)
    }

    fn remove_dependency(&mut self, config: &str, edge: &DependencyEdge) -> Result<()> {
        let node = self.node_mut(config)?;
        let before = node.edges.len();
        node.edges.retain(|e| e.id != edge.id);
        if node.edges.len() == before {
            return Err(IvysnapError::ConfigError(format!(
                "configuration '{config}' has no dependency edge #{}",
                edge.id
            )));
        }
        debug!(source = %config, target = %edge.target, edge = edge.id, "removed dependency edge");
        Ok(())
    }

    fn persist(&mut self, config: &str) -> Result<()> {
        self.node_mut(config)?;
        self.persisted.push(config.to_string());
        Ok(())
    }

    fn display_name(&self, config: &str) -> String {
        self.node(config)
            .and_then(|n| n.name.clone())
            .unwrap_or_else(|| config.to_string())
    }
}
