//! # Case Layout
//!
//! Locates a schema's example and invalid-case documents by convention.
//! For a schema at `<group>/schemas/order.schema.json` the defaults are:
//!
//! ```text
//! <group>/examples/**/*.json        expected to validate
//! <group>/tests/invalid/**/*.json   expected to fail
//! ```
//!
//! Both directory names and the candidate extensions are configurable.
//! Discovery is recursive and returns paths sorted for deterministic runs.

use std::path::{Path, PathBuf};

/// Where a schema's cases live, relative to the schema's grandparent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLayout {
    /// Directory of documents expected to validate.
    pub examples_dir: PathBuf,
    /// Directory of documents expected to fail validation.
    pub invalid_dir: PathBuf,
    /// File extensions (without the dot) treated as candidate documents.
    pub extensions: Vec<String>,
}

impl Default for CaseLayout {
    fn default() -> Self {
        Self {
            examples_dir: PathBuf::from("examples"),
            invalid_dir: PathBuf::from("tests").join("invalid"),
            extensions: vec!["json".to_string()],
        }
    }
}

impl CaseLayout {
    /// Examples directory for the schema stored at `schema_path`.
    pub fn examples_for(&self, schema_path: &Path) -> PathBuf {
        group_dir(schema_path).join(&self.examples_dir)
    }

    /// Invalid-case directory for the schema stored at `schema_path`.
    pub fn invalid_for(&self, schema_path: &Path) -> PathBuf {
        group_dir(schema_path).join(&self.invalid_dir)
    }

    /// Recursively collect candidate documents under `dir`, sorted by path.
    ///
    /// Unreadable directories and entries are logged and skipped.
    pub fn discover(&self, dir: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        self.walk(dir, &mut found);
        found.sort();
        found
    }

    fn walk(&self, dir: &Path, acc: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(
                    dir = %dir.display(),
                    error = %e,
                    "failed to read directory during case discovery"
                );
                return;
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, acc);
            } else if self.is_candidate(&path) {
                acc.push(path);
            }
        }
    }

    fn is_candidate(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}

/// The schema's grandparent; falls back to its parent for shallow paths.
fn group_dir(schema_path: &Path) -> &Path {
    let parent = schema_path.parent().unwrap_or_else(|| Path::new(""));
    match parent.parent() {
        Some(grandparent) if !parent.as_os_str().is_empty() => grandparent,
        _ => parent,
    }
}
