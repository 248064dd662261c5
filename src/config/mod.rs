// src/config/mod.rs

//! Configuration loading and validation for ivysnap.
//!
//! Responsibilities:
//! - Define the TOML-backed registry snapshot model (`model.rs`).
//! - Load and save a snapshot, and load change sets (`loader.rs`, `changes.rs`).
//! - Validate basic invariants like known dependency targets (`validate.rs`).

pub mod changes;
pub mod loader;
pub mod model;
pub mod validate;

pub use changes::load_change_set;
pub use loader::{load_and_validate, load_from_path, save_registry};
pub use model::{ConfigurationEntry, GateSection, RawRegistryFile, RegistryFile};
