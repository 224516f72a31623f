//! # Harness Configuration
//!
//! Optional YAML configuration. Every field has a default, so an empty file
//! and no file at all are equivalent:
//!
//! ```yaml
//! registry: registry.json
//! examples_dir: examples
//! invalid_dir: tests/invalid
//! max_errors_per_case: 10
//! extensions: [json]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::CaseLayout;

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Config location.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid configuration YAML.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Config location.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
}

/// Tunables for a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Manifest file, relative to the spec root.
    pub registry: PathBuf,
    /// Examples directory name, relative to each schema's grandparent.
    pub examples_dir: PathBuf,
    /// Invalid-case directory, relative to each schema's grandparent.
    pub invalid_dir: PathBuf,
    /// Violations listed per failing case in the text report.
    pub max_errors_per_case: usize,
    /// Candidate document extensions.
    pub extensions: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let layout = CaseLayout::default();
        Self {
            registry: PathBuf::from("registry.json"),
            examples_dir: layout.examples_dir,
            invalid_dir: layout.invalid_dir,
            max_errors_per_case: 10,
            extensions: layout.extensions,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// The case layout these settings describe.
    pub fn layout(&self) -> CaseLayout {
        CaseLayout {
            examples_dir: self.examples_dir.clone(),
            invalid_dir: self.invalid_dir.clone(),
            extensions: self.extensions.clone(),
        }
    }
}
