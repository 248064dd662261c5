// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::config::model::{RawRegistryFile, RegistryFile};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Load a registry snapshot from a given path and return the raw `RawRegistryFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawRegistryFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let registry: RawRegistryFile = toml::from_str(&contents)?;

    Ok(registry)
}

/// Load a registry snapshot from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - unknown dependency references and self-dependencies,
///   - dependency cycles (logged only),
///   - `[gate]` sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RegistryFile> {
    let raw = load_from_path(&path)?;
    let registry = RegistryFile::try_from(raw)?;
    Ok(registry)
}

/// Write a registry snapshot back through `filesystem`.
pub fn save_registry(
    filesystem: &dyn FileSystem,
    path: impl AsRef<Path>,
    registry: &RegistryFile,
) -> Result<()> {
    let path = path.as_ref();
    let raw = registry.clone().into_raw();
    let contents = toml::to_string(&raw)
        .with_context(|| format!("serializing registry for {:?}", path))?;
    filesystem.write(path, contents.as_bytes())?;
    Ok(())
}
