//! # Schema Manifest
//!
//! The manifest declares the closed set of schemas a run may resolve
//! against. It is a document with a `schemas` sequence of `{id, path}`
//! entries; paths are relative to the directory holding the manifest.
//!
//! ```json
//! {
//!   "schemas": [
//!     { "id": "https://example.org/order.json", "path": "order/schemas/order.schema.json" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ManifestViolation;
use crate::identity::SchemaId;

/// One declared schema: its stable identifier and storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaManifestEntry {
    /// Identifier other schemas use to `$ref` this one.
    pub id: SchemaId,
    /// Location of the schema document, relative to the manifest directory.
    pub path: PathBuf,
}

/// A parsed manifest, preserving declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Declared schemas, in the order the run reports them.
    #[serde(default)]
    pub schemas: Vec<SchemaManifestEntry>,
    /// Entries that did not have the `{id, path}` shape, in declaration order.
    #[serde(skip)]
    pub rejected: Vec<ManifestViolation>,
}

/// The manifest's outer shape; entries are checked one at a time.
#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    schemas: Vec<Value>,
}

impl Manifest {
    /// Interpret an already-parsed document as a manifest.
    ///
    /// Fails only if the document itself has the wrong shape. Each entry
    /// that cannot be read lands in [`Manifest::rejected`] as a
    /// [`ManifestViolation::MalformedEntry`], and parsing moves on.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: RawManifest = serde_json::from_value(value)?;
        let mut manifest = Self::default();
        for (index, entry) in raw.schemas.into_iter().enumerate() {
            let id = entry.get("id").and_then(Value::as_str).map(SchemaId::from);
            match serde_json::from_value::<SchemaManifestEntry>(entry) {
                Ok(parsed) => manifest.schemas.push(parsed),
                Err(e) => manifest.rejected.push(ManifestViolation::MalformedEntry {
                    index,
                    id,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(manifest)
    }

    /// Returns true if no entries are declared, well-formed or not.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.rejected.is_empty()
    }

    /// Returns the number of well-formed entries.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Identifiers declared more than once, sorted, each reported once.
    pub fn duplicate_ids(&self) -> Vec<SchemaId> {
        let mut counts: BTreeMap<&SchemaId, usize> = BTreeMap::new();
        for entry in &self.schemas {
            *counts.entry(&entry.id).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
