// src/registry/mod.rs

//! Build configuration registry.
//!
//! The registry is owned by the host (a CI server, or the TOML-backed
//! [`memory::InMemoryRegistry`] used by the CLI). The core only reads
//! parameters and edges through [`ConfigurationRegistry`] and issues
//! add/remove/persist commands; it never holds on to registry state between
//! calls.

pub mod graph;
pub mod memory;

use crate::errors::Result;

/// Canonical build configuration id used throughout the crate.
pub type ConfigId = String;

/// Opaque identity of a dependency edge as assigned by the registry.
pub type EdgeId = u64;

/// An outgoing snapshot dependency `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub id: EdgeId,
    pub source: ConfigId,
    pub target: ConfigId,
}

pub trait ConfigurationRegistry {
    /// All active configurations, in the registry's enumeration order.
    fn active_configurations(&self) -> Vec<ConfigId>;

    /// Whether `config` has a parameter named `key` (value is irrelevant).
    fn has_parameter(&self, config: &str, key: &str) -> bool;

    /// Current outgoing edges of `config`, in insertion order.
    fn dependencies(&self, config: &str) -> Result<Vec<DependencyEdge>>;

    fn add_dependency(&mut self, config: &str, target: &str) -> Result<DependencyEdge>;

    fn remove_dependency(&mut self, config: &str, edge: &DependencyEdge) -> Result<()>;

    /// Durably commit pending changes to `config`.
    fn persist(&mut self, config: &str) -> Result<()>;

    /// Human-readable name for logs; defaults to the id.
    fn display_name(&self, config: &str) -> String {
        config.to_string()
    }
}

pub use graph::find_cycle;
pub use memory::InMemoryRegistry;
