// src/artifacts/mod.rs

//! Build artifacts and published descriptors.
//!
//! Each configuration publishes its `ivy.xml` as a build artifact. The
//! descriptor a configuration *currently* stands for is the one found in
//! its latest finished build.

pub mod dir;

use globset::GlobMatcher;
use tracing::{debug, warn};

use crate::descriptor::{self, Descriptor};
use crate::errors::Result;

pub use dir::DirArtifactStore;

/// One node of a build's artifact tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    /// Path relative to the artifact root, with forward slashes.
    pub relative_path: String,
    pub is_file: bool,
}

pub trait ArtifactStore {
    /// Artifacts of the latest finished build of `config`, depth-first.
    ///
    /// Returns `Ok(None)` if the configuration has no finished build.
    fn latest_artifacts(&self, config: &str) -> Result<Option<Vec<ArtifactEntry>>>;

    /// Read the content of one artifact of the latest finished build.
    fn read(&self, config: &str, relative_path: &str) -> Result<Vec<u8>>;
}

/// Find the descriptor currently published by `config`.
///
/// Artifacts are scanned in store order and the first file that matches
/// `pattern` *and* parses wins. Files that match but fail to read or parse
/// are logged and skipped. A failure to list the artifacts is returned to
/// the caller.
pub fn current_descriptor(
    store: &dyn ArtifactStore,
    config: &str,
    pattern: &GlobMatcher,
) -> Result<Option<Descriptor>> {
    let Some(entries) = store.latest_artifacts(config)? else {
        debug!(config = %config, "no finished build, no current descriptor");
        return Ok(None);
    };

    let found = entries
        .iter()
        .filter(|entry| entry.is_file && pattern.is_match(&entry.relative_path))
        .find_map(|entry| {
            debug!(config = %config, artifact = %entry.relative_path, "analyzing artifact");
            let parsed = store
                .read(config, &entry.relative_path)
                .and_then(|bytes| descriptor::parse(&bytes));
            match parsed {
                Ok(d) => Some(d),
                Err(err) => {
                    warn!(config = %config, artifact = %entry.relative_path, error = %err, "skipping unreadable descriptor artifact");
                    None
                }
            }
        });

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use globset::Glob;

    use crate::errors::IvysnapError;

    #[derive(Default)]
    struct FakeStore {
        builds: HashMap<String, Vec<(String, bool, Vec<u8>)>>,
    }

    impl FakeStore {
        fn with(mut self, config: &str, path: &str, is_file: bool, content: &str) -> Self {
            self.builds
                .entry(config.to_string())
                .or_default()
                .push((path.to_string(), is_file, content.as_bytes().to_vec()));
            self
        }
    }

    impl ArtifactStore for FakeStore {
        fn latest_artifacts(&self, config: &str) -> Result<Option<Vec<ArtifactEntry>>> {
            Ok(self.builds.get(config).map(|items| {
                items
                    .iter()
                    .map(|(p, f, _)| ArtifactEntry {
                        relative_path: p.clone(),
                        is_file: *f,
                    })
                    .collect()
            }))
        }

        fn read(&self, config: &str, relative_path: &str) -> Result<Vec<u8>> {
            self.builds
                .get(config)
                .and_then(|items| items.iter().find(|(p, _, _)| p == relative_path))
                .map(|(_, _, c)| c.clone())
                .ok_or_else(|| IvysnapError::ArtifactUnavailable {
                    config: config.to_string(),
                    reason: format!("{relative_path} not found"),
                })
        }
    }

    fn pattern() -> GlobMatcher {
        Glob::new("ivy*.xml").unwrap().compile_matcher()
    }

    fn ivy(module: &str) -> String {
        format!(r#"<ivy-module><info organisation="o" module="{module}" revision="1"/></ivy-module>"#)
    }

    #[test]
    fn never_built_has_no_descriptor() {
        let store = FakeStore::default();
        assert!(current_descriptor(&store, "A", &pattern()).unwrap().is_none());
    }

    #[test]
    fn first_matching_file_wins() {
        let store = FakeStore::default()
            .with("A", "readme.txt", true, "hello")
            .with("A", "ivy.xml", false, "")
            .with("A", "ivy-first.xml", true, &ivy("first"))
            .with("A", "ivy-second.xml", true, &ivy("second"));

        let d = current_descriptor(&store, "A", &pattern()).unwrap().unwrap();
        assert_eq!(d.identity().module, "first");
    }

    #[test]
    fn broken_artifact_is_skipped() {
        let store = FakeStore::default()
            .with("A", "ivy-broken.xml", true, "<ivy-module>")
            .with("A", "ivy.xml", true, &ivy("good"));

        let d = current_descriptor(&store, "A", &pattern()).unwrap().unwrap();
        assert_eq!(d.identity().module, "good");
    }

    #[test]
    fn pattern_spans_directories() {
        let store = FakeStore::default().with("A", "ivy/published.xml", true, &ivy("nested"));
        let d = current_descriptor(&store, "A", &pattern()).unwrap().unwrap();
        assert_eq!(d.identity().module, "nested");
    }
}
