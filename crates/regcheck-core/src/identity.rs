//! # Schema Identity
//!
//! Newtype wrapper for registered schema identifiers. A `SchemaId` is the
//! key of the resolution universe and the base (fragment-free) form of every
//! `$ref` target compared against it.

use serde::{Deserialize, Serialize};

/// Delimiter separating a reference's document identifier from its fragment.
pub const FRAGMENT_DELIMITER: char = '#';

/// Stable identifier of one registered schema document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(String);

impl SchemaId {
    /// Wrap an identifier string as-is.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Normalize a raw `$ref` value into the identifier of the document it
    /// targets by stripping everything from the first `#` onwards.
    ///
    /// Returns `None` for local references (`#/$defs/x`), which address the
    /// containing document rather than a separate one.
    pub fn from_reference(reference: &str) -> Option<Self> {
        let base = reference
            .split_once(FRAGMENT_DELIMITER)
            .map_or(reference, |(base, _)| base);
        if base.is_empty() {
            None
        } else {
            Some(Self(base.to_string()))
        }
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the identifier string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SchemaId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SchemaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
