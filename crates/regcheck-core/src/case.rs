//! # Example Cases and Validation Outcomes
//!
//! A case is one document paired with the outcome its location promises:
//! documents under a schema's examples directory must validate, documents
//! under its invalid-tests directory must not.
//!
//! Engine results are carried as [`Violation`]s whose `location` is the
//! JSON Pointer of the offending instance node. For display, locations are
//! rendered JSONPath-style (`$.items[0].sku`) and violations are ordered by
//! their decoded path so reports are stable across engine versions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::SchemaId;

/// The outcome a case is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Drawn from the examples location; must validate.
    Valid,
    /// Drawn from the invalid-tests location; must be rejected.
    Invalid,
}

impl Expectation {
    /// What the engine reported when a case with this label fails.
    pub fn contradiction(&self) -> &'static str {
        match self {
            Self::Valid => "errors",
            Self::Invalid => "no errors",
        }
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

/// One parsed test input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleCase {
    /// Where the document was loaded from.
    pub path: PathBuf,
    /// The schema the document is checked against.
    pub schema_id: SchemaId,
    /// Whether the document should pass or fail.
    pub expected: Expectation,
    /// The parsed document.
    pub document: Value,
}

/// A single validation error reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON Pointer to the violating node; empty for the document root.
    pub location: String,
    /// Human-readable description of the violation.
    pub message: String,
}

/// One decoded step of a violation location.
///
/// Indices order before keys so that sorting is total over mixed paths.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Array element.
    Index(usize),
    /// Object property.
    Key(String),
}

impl Violation {
    /// Construct a violation at the given JSON Pointer.
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Decode the JSON Pointer into path segments.
    ///
    /// All-digit tokens are read as array indices.
    pub fn segments(&self) -> Vec<PathSegment> {
        if self.location.is_empty() {
            return Vec::new();
        }
        let pointer = self.location.strip_prefix('/').unwrap_or(&self.location);
        pointer
            .split('/')
            .map(|token| {
                let token = token.replace("~1", "/").replace("~0", "~");
                match token.parse::<usize>() {
                    Ok(index) if token.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(index),
                    _ => PathSegment::Key(token),
                }
            })
            .collect()
    }

    /// Render the location JSONPath-style, rooted at `$`.
    pub fn json_path(&self) -> String {
        let mut out = String::from("$");
        for segment in self.segments() {
            match segment {
                PathSegment::Index(i) => out.push_str(&format!("[{i}]")),
                PathSegment::Key(k) => {
                    out.push('.');
                    out.push_str(&k);
                }
            }
        }
        out
    }

    /// Stable sort by decoded location; ties keep engine order.
    pub fn sort_by_location(violations: &mut [Violation]) {
        violations.sort_by_cached_key(Violation::segments);
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.json_path(), self.message)
    }
}

/// The engine's verdict on one case.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// The case that was validated.
    pub case: ExampleCase,
    /// Ordered violations; empty means the document validated.
    pub errors: Vec<Violation>,
}

impl ValidationOutcome {
    /// Returns true if the engine reported no violations.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if the engine's verdict agrees with the case label.
    pub fn matches_expectation(&self) -> bool {
        match self.case.expected {
            Expectation::Valid => self.errors.is_empty(),
            Expectation::Invalid => !self.errors.is_empty(),
        }
    }
}
