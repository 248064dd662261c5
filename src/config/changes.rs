// src/config/changes.rs

//! Change sets described in TOML, for replaying commits offline.
//!
//! ```toml
//! [[change]]
//! path = "app/ivy.xml"
//! before = "app/ivy.before.xml"   # omit for an added file
//! after = "app/ivy.after.xml"     # omit for a deleted file
//! ```
//!
//! `before` / `after` are read relative to the change file's directory.

use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::gate::{ChangeSet, FileChange};

#[derive(Debug, Clone, Deserialize)]
struct RawChangeFile {
    #[serde(default)]
    change: Vec<RawChange>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawChange {
    path: String,
    #[serde(default)]
    before: Option<String>,
    #[serde(default)]
    after: Option<String>,
}

pub fn load_change_set(fs: &dyn FileSystem, path: &Path) -> Result<ChangeSet> {
    let contents = fs.read_to_string(path)?;
    let raw: RawChangeFile = toml::from_str(&contents)?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let read = |rel: &Option<String>| -> Result<Option<Vec<u8>>> {
        match rel {
            Some(rel) => Ok(Some(fs.read(&base.join(rel))?)),
            None => Ok(None),
        }
    };

    let changes = raw
        .change
        .iter()
        .map(|c| -> Result<FileChange> {
            Ok(FileChange {
                path: c.path.clone(),
                before: read(&c.before)?,
                after: read(&c.after)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChangeSet { changes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn reads_halves_relative_to_change_file() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "replay/changes.toml",
            r#"
[[change]]
path = "app/ivy.xml"
before = "old.xml"
after = "new.xml"

[[change]]
path = "lib/ivy.xml"
after = "new.xml"
"#,
        );
        fs.add_file("replay/old.xml", "old");
        fs.add_file("replay/new.xml", "new");

        let set = load_change_set(&fs, Path::new("replay/changes.toml")).unwrap();
        assert_eq!(set.changes.len(), 2);
        assert_eq!(set.changes[0].before.as_deref(), Some(&b"old"[..]));
        assert_eq!(set.changes[0].after.as_deref(), Some(&b"new"[..]));
        assert_eq!(set.changes[1].before, None);
    }

    #[test]
    fn missing_half_file_is_an_error() {
        let fs = MockFileSystem::new();
        fs.add_file("c.toml", "[[change]]\npath = \"ivy.xml\"\nbefore = \"gone.xml\"\n");
        assert!(load_change_set(&fs, Path::new("c.toml")).is_err());
    }
}
