//! # Report Aggregator
//!
//! Per-case results roll up into per-schema reports and a single
//! [`RunReport`], whose [`RunSummary`] is the sole authority for the
//! process-level success signal.
//!
//! Rendering is a pure function of the report, so two runs over an
//! unchanged tree produce byte-identical output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use regcheck_core::{
    CaseFailure, ExitStatus, Expectation, RunSummary, SchemaId, ValidationOutcome, Violation,
};
use serde::Serialize;

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    /// Document location, relative to the spec root where possible.
    pub path: PathBuf,
    /// The label the case carried.
    pub expected: Expectation,
    /// Every violation the engine reported, sorted by location.
    pub errors: Vec<Violation>,
    /// Why the case failed; `None` if it passed.
    pub failure: Option<CaseFailure>,
}

impl CaseReport {
    /// Judge an engine outcome against its label.
    pub fn from_outcome(outcome: ValidationOutcome, path: PathBuf) -> Self {
        let failure = (!outcome.matches_expectation()).then_some(CaseFailure::Mismatch {
            expected: outcome.case.expected,
        });
        let mut errors = outcome.errors;
        Violation::sort_by_location(&mut errors);
        Self {
            path,
            expected: outcome.case.expected,
            errors,
            failure,
        }
    }

    /// A case that failed before or instead of validation.
    pub fn failed(path: PathBuf, expected: Expectation, failure: CaseFailure) -> Self {
        Self {
            path,
            expected,
            errors: Vec::new(),
            failure: Some(failure),
        }
    }

    /// True if the outcome matched the label.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Results for one registered schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaReport {
    /// The schema's id.
    pub id: SchemaId,
    /// Schema location, relative to the spec root where possible.
    pub path: PathBuf,
    /// Examples directory that was looked for.
    pub examples_dir: PathBuf,
    /// True if the examples directory did not exist.
    pub examples_skipped: bool,
    /// Cases in run order: examples first, then invalid cases.
    pub cases: Vec<CaseReport>,
    /// Counts for this schema.
    pub summary: RunSummary,
}

impl SchemaReport {
    /// Start an empty report.
    pub fn new(id: SchemaId, path: PathBuf, examples_dir: PathBuf) -> Self {
        Self {
            id,
            path,
            examples_dir,
            examples_skipped: false,
            cases: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Append a case and count it.
    pub fn push(&mut self, case: CaseReport) {
        self.summary.record(case.passed());
        self.cases.push(case);
    }
}

/// Results for a full run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Per-schema results in manifest declaration order.
    pub schemas: Vec<SchemaReport>,
    /// Totals across all schemas.
    pub summary: RunSummary,
}

impl RunReport {
    /// Append a schema report and fold its counts into the totals.
    pub fn push(&mut self, schema: SchemaReport) {
        self.summary.absorb(schema.summary);
        self.schemas.push(schema);
    }

    /// Examples directories that were absent, in run order.
    pub fn skipped_example_dirs(&self) -> impl Iterator<Item = &Path> {
        self.schemas
            .iter()
            .filter(|s| s.examples_skipped)
            .map(|s| s.examples_dir.as_path())
    }

    /// Process exit status for this run.
    pub fn exit_status(&self) -> ExitStatus {
        self.summary.exit_status()
    }

    /// Render the human-readable report.
    ///
    /// At most `max_errors` violations are listed per failing case; the rest
    /// are counted on a trailing line.
    pub fn render_text(&self, max_errors: usize) -> String {
        let mut out = String::new();
        for schema in &self.schemas {
            for case in &schema.cases {
                render_case(&mut out, schema, case, max_errors);
            }
        }

        let skipped: Vec<String> = self
            .skipped_example_dirs()
            .map(|p| p.display().to_string())
            .collect();
        if !skipped.is_empty() {
            let _ = writeln!(out, "\n(Info) No examples found under: {}", skipped.join(", "));
        }

        let _ = writeln!(out, "\n{}", self.summary);
        out
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn render_case(out: &mut String, schema: &SchemaReport, case: &CaseReport, max_errors: usize) {
    let path = case.path.display();
    let schema_path = schema.path.display();
    let _ = match (&case.failure, case.expected) {
        (None, Expectation::Valid) => writeln!(out, "✅ {path}"),
        (None, Expectation::Invalid) => writeln!(out, "✅ (expected fail) {path}"),
        (Some(CaseFailure::Mismatch { .. }), Expectation::Valid) => {
            let _ = writeln!(out, "❌ {path} (schema: {schema_path})");
            for v in case.errors.iter().take(max_errors) {
                let _ = writeln!(out, "   - {v}");
            }
            if case.errors.len() > max_errors {
                let _ = writeln!(out, "   ... and {} more", case.errors.len() - max_errors);
            }
            Ok(())
        }
        (Some(CaseFailure::Mismatch { .. }), Expectation::Invalid) => {
            writeln!(out, "❌ (should fail but passed) {path}")
        }
        (Some(CaseFailure::Malformed { reason }), _) => {
            writeln!(out, "❌ (malformed) {path}: {reason}")
        }
        (Some(CaseFailure::Engine { reason }), _) => {
            writeln!(out, "❌ (engine error) {path} (schema: {schema_path}): {reason}")
        }
    };
}

/// Express `path` relative to `root` when it lies beneath it.
pub fn display_path(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
