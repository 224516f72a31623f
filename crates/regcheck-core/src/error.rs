//! # Error Types — Harness Error Taxonomy
//!
//! Fatal errors ([`ManifestError`], [`ClosureError`]) abort a run before any
//! case is validated and always list every violation found, never only the
//! first. Local errors ([`CaseFailure`]) are attached to a single case,
//! counted as a failure, and never abort sibling cases.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::case::Expectation;
use crate::identity::SchemaId;

/// One problem found while materializing the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestViolation {
    /// An entry is not an `{id, path}` pair.
    MalformedEntry {
        /// Zero-based position in the `schemas` sequence.
        index: usize,
        /// The entry's id, when it has a string one.
        id: Option<SchemaId>,
        /// What was wrong with it.
        reason: String,
    },
    /// The same id is declared by more than one entry.
    DuplicateId {
        /// The repeated identifier.
        id: SchemaId,
    },
    /// An entry declares an empty id.
    EmptyId {
        /// Path declared by the offending entry.
        path: PathBuf,
    },
    /// The declared path does not exist.
    SchemaNotFound {
        /// Entry identifier.
        id: SchemaId,
        /// Resolved location that was checked.
        path: PathBuf,
    },
    /// The declared path exists but could not be read or parsed.
    SchemaUnloadable {
        /// Entry identifier.
        id: SchemaId,
        /// Resolved location of the document.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },
}

impl fmt::Display for ManifestViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEntry { index, id: Some(id), reason } => {
                write!(f, "malformed entry schemas[{index}] (id: {id}): {reason}")
            }
            Self::MalformedEntry { index, id: None, reason } => {
                write!(f, "malformed entry schemas[{index}]: {reason}")
            }
            Self::DuplicateId { id } => write!(f, "duplicate schema id: {id}"),
            Self::EmptyId { path } => write!(f, "empty schema id for {}", path.display()),
            Self::SchemaNotFound { id, path } => {
                write!(f, "listed schema not found: {} (id: {id})", path.display())
            }
            Self::SchemaUnloadable { id, path, reason } => {
                write!(f, "cannot load schema {} (id: {id}): {reason}", path.display())
            }
        }
    }
}

/// Fatal configuration error: the manifest cannot produce a resolution universe.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("missing {}", path.display())]
    NotFound {
        /// Expected manifest location.
        path: PathBuf,
    },

    /// The manifest file could not be read or parsed.
    #[error("malformed manifest {}: {reason}", path.display())]
    Malformed {
        /// Manifest location.
        path: PathBuf,
        /// Parser or I/O message.
        reason: String,
    },

    /// The manifest declares no schemas.
    #[error("{} has no 'schemas' entries", path.display())]
    Empty {
        /// Manifest location.
        path: PathBuf,
    },

    /// One or more entries are unusable.
    #[error("{} manifest violation(s):\n{}", .0.len(), bullet_list(&.0))]
    Invalid(Vec<ManifestViolation>),
}

impl ManifestError {
    /// All violations carried by this error; empty for file-level failures.
    pub fn violations(&self) -> &[ManifestViolation] {
        match self {
            Self::Invalid(v) => v,
            _ => &[],
        }
    }
}

/// Fatal closure error: registered schemas reference unregistered ids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "the following $ref targets are not present in the registry:\n{}\n\
     Fix: add these ids to the registry (or update your $ref to use the registered id).",
    bullet_list(&.unresolved)
)]
pub struct ClosureError {
    unresolved: Vec<SchemaId>,
    referrers: BTreeMap<SchemaId, BTreeSet<SchemaId>>,
}

impl ClosureError {
    /// Build from a map of unresolved id to the registered schemas that
    /// reference it. The key set becomes the sorted violation list.
    pub fn new(referrers: BTreeMap<SchemaId, BTreeSet<SchemaId>>) -> Self {
        Self {
            unresolved: referrers.keys().cloned().collect(),
            referrers,
        }
    }

    /// Sorted, deduplicated unresolved identifiers.
    pub fn unresolved(&self) -> &[SchemaId] {
        &self.unresolved
    }

    /// Registered schemas that reference `id`, sorted.
    pub fn referrers(&self, id: &SchemaId) -> impl Iterator<Item = &SchemaId> {
        self.referrers.get(id).into_iter().flatten()
    }
}

/// Why a single case counted as failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseFailure {
    /// The engine's verdict contradicts the case label.
    #[error("expected {expected} but engine reported {}", .expected.contradiction())]
    Mismatch {
        /// The label the case carried.
        expected: Expectation,
    },

    /// The document could not be read or parsed.
    #[error("malformed document: {reason}")]
    Malformed {
        /// Reader or parser message.
        reason: String,
    },

    /// The engine could not evaluate the schema.
    #[error("engine error: {reason}")]
    Engine {
        /// Engine message.
        reason: String,
    },
}

fn bullet_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
