// src/artifacts/dir.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::artifacts::{ArtifactEntry, ArtifactStore};
use crate::config::model::RegistryFile;
use crate::errors::{IvysnapError, Result};
use crate::fs::FileSystem;

/// Artifact store backed by one directory per configuration.
///
/// The directory stands for the latest finished build's artifact tree.
/// Listing is depth-first with entries sorted by name, so the enumeration
/// order is fixed for a given tree.
#[derive(Debug)]
pub struct DirArtifactStore<F: FileSystem> {
    fs: F,
    dirs: HashMap<String, PathBuf>,
}

impl<F: FileSystem> DirArtifactStore<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            dirs: HashMap::new(),
        }
    }

    /// Build a store from the `artifacts = "..."` entries of a registry
    /// snapshot, resolving relative paths against `root`.
    pub fn from_registry(fs: F, root: &Path, registry: &RegistryFile) -> Self {
        let mut store = Self::new(fs);
        for (id, entry) in registry.configurations() {
            if let Some(dir) = &entry.artifacts {
                store.dirs.insert(id.clone(), root.join(dir));
            }
        }
        store
    }

    pub fn with_dir(mut self, config: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.dirs.insert(config.into(), dir.into());
        self
    }

    fn walk(&self, root: &Path, dir: &Path, out: &mut Vec<ArtifactEntry>) -> anyhow::Result<()> {
        for path in self.fs.read_dir(dir)? {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let relative_path = rel.to_string_lossy().replace('\\', "/");

            if self.fs.is_dir(&path) {
                out.push(ArtifactEntry {
                    relative_path,
                    is_file: false,
                });
                self.walk(root, &path, out)?;
            } else {
                out.push(ArtifactEntry {
                    relative_path,
                    is_file: self.fs.is_file(&path),
                });
            }
        }
        Ok(())
    }
}

impl<F: FileSystem> ArtifactStore for DirArtifactStore<F> {
    fn latest_artifacts(&self, config: &str) -> Result<Option<Vec<ArtifactEntry>>> {
        let Some(root) = self.dirs.get(config) else {
            return Ok(None);
        };
        if !self.fs.is_dir(root) {
            return Ok(None);
        }

        let mut entries = Vec::new();
        self.walk(root, root, &mut entries)
            .with_context(|| format!("listing artifacts of {config} in {:?}", root))
            .map_err(|e| IvysnapError::ArtifactUnavailable {
                config: config.to_string(),
                reason: format!("{e:#}"),
            })?;
        Ok(Some(entries))
    }

    fn read(&self, config: &str, relative_path: &str) -> Result<Vec<u8>> {
        let root = self
            .dirs
            .get(config)
            .ok_or_else(|| IvysnapError::ArtifactUnavailable {
                config: config.to_string(),
                reason: "no artifact directory configured".to_string(),
            })?;

        self.fs
            .read(&root.join(relative_path))
            .map_err(|e| IvysnapError::ArtifactUnavailable {
                config: config.to_string(),
                reason: format!("{e:#}"),
            })
    }
}
