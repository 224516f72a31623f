//! # Validation Orchestrator
//!
//! Drives per-document validation over a closed [`ResolutionUniverse`].
//!
//! For each schema, in manifest declaration order:
//!
//! 1. Locate the examples directory. If it is absent the schema is recorded
//!    as skipped, which is not a failure.
//! 2. Validate every example (sorted by path) and expect no violations.
//! 3. Locate the invalid-case directory. If present, validate every document
//!    in it and expect at least one violation.
//!
//! Failures are local to their case. A malformed document or an engine
//! error counts as one failed case and the run carries on with the next.

use std::path::{Path, PathBuf};

use regcheck_core::{CaseFailure, ExampleCase, Expectation, ValidationOutcome};

use crate::engine::ValidationEngine;
use crate::layout::CaseLayout;
use crate::loader::DocumentLoader;
use crate::registry::{RegisteredSchema, ResolutionUniverse};
use crate::report::{display_path, CaseReport, RunReport, SchemaReport};

/// Runs every case of every registered schema through an injected engine.
pub struct Orchestrator<'a, E: ValidationEngine> {
    universe: &'a ResolutionUniverse,
    engine: E,
    loader: &'a dyn DocumentLoader,
    layout: CaseLayout,
    root: PathBuf,
}

impl<'a, E: ValidationEngine> Orchestrator<'a, E> {
    /// Create an orchestrator with the default [`CaseLayout`].
    pub fn new(universe: &'a ResolutionUniverse, engine: E, loader: &'a dyn DocumentLoader) -> Self {
        Self {
            universe,
            engine,
            loader,
            layout: CaseLayout::default(),
            root: PathBuf::new(),
        }
    }

    /// Use a custom case layout.
    pub fn with_layout(mut self, layout: CaseLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Report paths relative to `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Validate all cases of all schemas.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        for schema in self.universe.iter() {
            report.push(self.run_schema(schema));
        }
        tracing::info!(
            total = report.summary.total,
            passed = report.summary.passed(),
            failed = report.summary.failed,
            "validation run finished"
        );
        report
    }

    /// Validate all cases of one schema.
    pub fn run_schema(&self, schema: &RegisteredSchema) -> SchemaReport {
        let examples_dir = self.layout.examples_for(&schema.path);
        let mut report = SchemaReport::new(
            schema.id.clone(),
            display_path(&schema.path, &self.root),
            display_path(&examples_dir, &self.root),
        );

        if examples_dir.is_dir() {
            for path in self.layout.discover(&examples_dir) {
                report.push(self.run_case(schema, &path, Expectation::Valid));
            }
        } else {
            tracing::warn!(
                schema = %schema.id,
                dir = %examples_dir.display(),
                "no examples directory; skipping"
            );
            report.examples_skipped = true;
        }

        let invalid_dir = self.layout.invalid_for(&schema.path);
        if invalid_dir.is_dir() {
            for path in self.layout.discover(&invalid_dir) {
                report.push(self.run_case(schema, &path, Expectation::Invalid));
            }
        }

        report
    }

    fn run_case(&self, schema: &RegisteredSchema, path: &Path, expected: Expectation) -> CaseReport {
        let shown = display_path(path, &self.root);

        let document = match self.loader.load(path) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!(case = %shown.display(), error = %e, "malformed case document");
                return CaseReport::failed(
                    shown,
                    expected,
                    CaseFailure::Malformed {
                        reason: e.to_string(),
                    },
                );
            }
        };

        let case = ExampleCase {
            path: path.to_path_buf(),
            schema_id: schema.id.clone(),
            expected,
            document,
        };

        match self.engine.validate(&schema.id, self.universe, &case.document) {
            Ok(errors) => {
                let outcome = ValidationOutcome { case, errors };
                tracing::debug!(
                    case = %shown.display(),
                    %expected,
                    violations = outcome.errors.len(),
                    "validated case"
                );
                CaseReport::from_outcome(outcome, shown)
            }
            Err(e) => CaseReport::failed(
                shown,
                expected,
                CaseFailure::Engine {
                    reason: e.to_string(),
                },
            ),
        }
    }
}
