//! # Registry Builder
//!
//! Turns a manifest of `(id, path)` declarations into a [`ResolutionUniverse`]:
//! the closed id → document map every later stage works from.
//!
//! The builder does not interpret references. It only materializes documents
//! and enforces manifest-level invariants:
//!
//! - the manifest exists, parses, and declares at least one schema;
//! - ids are non-empty and unique;
//! - every declared path resolves to a loadable document.
//!
//! Entry violations are collected across the whole manifest and reported
//! together in a single [`ManifestError::Invalid`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use regcheck_core::{Manifest, ManifestError, ManifestViolation, SchemaId};
use serde_json::Value;

use crate::loader::{DocumentLoader, LoadError};

/// One schema materialized from the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredSchema {
    /// Declared identifier.
    pub id: SchemaId,
    /// Resolved location of the schema document.
    pub path: PathBuf,
    /// Parsed schema, shared with the engine's retriever.
    pub document: Arc<Value>,
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// The id → document map covering exactly the manifest's declared ids,
/// iterated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResolutionUniverse {
    schemas: Vec<RegisteredSchema>,
    index: HashMap<SchemaId, usize>,
    generation: u64,
}

impl ResolutionUniverse {
    /// Assemble a universe from already-loaded schemas.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Invalid`] listing every duplicated id.
    pub fn from_schemas(schemas: Vec<RegisteredSchema>) -> Result<Self, ManifestError> {
        let mut index = HashMap::with_capacity(schemas.len());
        let mut duplicates = Vec::new();
        for (i, schema) in schemas.iter().enumerate() {
            if index.insert(schema.id.clone(), i).is_some() && !duplicates.contains(&schema.id) {
                duplicates.push(schema.id.clone());
            }
        }
        if !duplicates.is_empty() {
            duplicates.sort();
            return Err(ManifestError::Invalid(
                duplicates
                    .into_iter()
                    .map(|id| ManifestViolation::DuplicateId { id })
                    .collect(),
            ));
        }
        Ok(Self {
            schemas,
            index,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schemas are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Identifies this universe's contents; clones share it, separately
    /// assembled universes never do. Engines key compiled schemas on it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if `id` is registered.
    pub fn contains(&self, id: &SchemaId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a registered schema.
    pub fn get(&self, id: &SchemaId) -> Option<&RegisteredSchema> {
        self.index.get(id).map(|&i| &self.schemas[i])
    }

    /// Look up a registered schema's document.
    pub fn document(&self, id: &SchemaId) -> Option<&Value> {
        self.get(id).map(|s| s.document.as_ref())
    }

    /// Registered schemas in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSchema> {
        self.schemas.iter()
    }

    /// Registered ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &SchemaId> {
        self.schemas.iter().map(|s| &s.id)
    }
}

/// Loads a manifest and its schemas through a [`DocumentLoader`].
///
/// Entry paths are resolved against the directory containing the manifest.
pub struct RegistryBuilder<'a, L: DocumentLoader + ?Sized> {
    loader: &'a L,
    manifest_path: PathBuf,
}

impl<'a, L: DocumentLoader + ?Sized> RegistryBuilder<'a, L> {
    /// Create a builder for the manifest at `manifest_path`.
    pub fn new(manifest_path: impl Into<PathBuf>, loader: &'a L) -> Self {
        Self {
            loader,
            manifest_path: manifest_path.into(),
        }
    }

    /// The directory entry paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Load and parse the manifest document.
    ///
    /// # Errors
    ///
    /// [`ManifestError::NotFound`] if the file is absent,
    /// [`ManifestError::Malformed`] if it cannot be read or does not have
    /// the manifest shape, [`ManifestError::Empty`] if it declares no schemas.
    pub fn load_manifest(&self) -> Result<Manifest, ManifestError> {
        let value = self.loader.load(&self.manifest_path).map_err(|e| match e {
            LoadError::NotFound { path } => ManifestError::NotFound { path },
            LoadError::Unreadable { path, reason } | LoadError::Malformed { path, reason } => {
                ManifestError::Malformed { path, reason }
            }
        })?;

        let manifest = Manifest::from_value(value).map_err(|e| ManifestError::Malformed {
            path: self.manifest_path.clone(),
            reason: e.to_string(),
        })?;

        if manifest.is_empty() {
            return Err(ManifestError::Empty {
                path: self.manifest_path.clone(),
            });
        }
        Ok(manifest)
    }

    /// Materialize every declared schema into a [`ResolutionUniverse`].
    ///
    /// # Errors
    ///
    /// [`ManifestError::Empty`] for an empty manifest; otherwise
    /// [`ManifestError::Invalid`] with every malformed entry, duplicate id,
    /// empty id, missing path, and unloadable document found.
    pub fn build(&self, manifest: &Manifest) -> Result<ResolutionUniverse, ManifestError> {
        if manifest.is_empty() {
            return Err(ManifestError::Empty {
                path: self.manifest_path.clone(),
            });
        }

        let mut violations = manifest.rejected.clone();
        violations.extend(
            manifest
                .duplicate_ids()
                .into_iter()
                .map(|id| ManifestViolation::DuplicateId { id }),
        );

        let mut schemas = Vec::with_capacity(manifest.len());
        let mut seen = HashSet::new();
        for entry in &manifest.schemas {
            let path = self.base_dir().join(&entry.path);
            if entry.id.as_str().is_empty() {
                violations.push(ManifestViolation::EmptyId { path });
                continue;
            }
            if !seen.insert(&entry.id) {
                continue;
            }
            match self.loader.load(&path) {
                Ok(document) => {
                    tracing::debug!(id = %entry.id, path = %path.display(), "loaded schema");
                    schemas.push(RegisteredSchema {
                        id: entry.id.clone(),
                        path,
                        document: Arc::new(document),
                    });
                }
                Err(LoadError::NotFound { path }) => {
                    violations.push(ManifestViolation::SchemaNotFound {
                        id: entry.id.clone(),
                        path,
                    });
                }
                Err(LoadError::Unreadable { path, reason } | LoadError::Malformed { path, reason }) => {
                    violations.push(ManifestViolation::SchemaUnloadable {
                        id: entry.id.clone(),
                        path,
                        reason,
                    });
                }
            }
        }

        if !violations.is_empty() {
            return Err(ManifestError::Invalid(violations));
        }

        let universe = ResolutionUniverse::from_schemas(schemas)?;
        tracing::info!(schema_count = universe.len(), "loaded schema registry");
        Ok(universe)
    }

    /// Load the manifest and build its universe in one step.
    pub fn load(&self) -> Result<(Manifest, ResolutionUniverse), ManifestError> {
        let manifest = self.load_manifest()?;
        let universe = self.build(&manifest)?;
        Ok((manifest, universe))
    }
}
