//! # Document Loading
//!
//! Reading files and parsing them into JSON values is an external capability
//! of the harness. [`DocumentLoader`] is the seam; [`FsLoader`] reads from the
//! local filesystem and picks the parser by extension: `.yaml`/`.yml` are
//! parsed as YAML and converted to JSON values, everything else as JSON.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Error loading one document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Nothing exists at the path.
    #[error("{} does not exist", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}: {reason}", path.display())]
    Unreadable {
        /// The file path.
        path: PathBuf,
        /// I/O error message.
        reason: String,
    },

    /// The file was read but is not well-formed JSON/YAML.
    #[error("cannot parse {}: {reason}", path.display())]
    Malformed {
        /// The file path.
        path: PathBuf,
        /// Parser error message.
        reason: String,
    },
}

/// Reads and parses documents.
pub trait DocumentLoader {
    /// Load the document at `path` as a JSON value.
    fn load(&self, path: &Path) -> Result<Value, LoadError>;
}

/// Loads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Value, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        })?;
        parse_document(path, &content)
    }
}

/// Parse `content` according to the extension of `path`.
pub fn parse_document(path: &Path, content: &str) -> Result<Value, LoadError> {
    let malformed = |reason: String| LoadError::Malformed {
        path: path.to_path_buf(),
        reason,
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;
            yaml_to_json_value(&yaml).map_err(malformed)
        }
        _ => serde_json::from_str(content).map_err(|e| malformed(e.to_string())),
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Manifests only use the JSON-compatible subset of YAML; tags are dropped
/// and scalar map keys are stringified.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                out.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(out))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
