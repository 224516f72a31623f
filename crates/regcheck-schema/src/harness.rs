//! # Harness Run
//!
//! The end-to-end pipeline: manifest → registry → closure check →
//! orchestrated validation → report. Fatal errors stop the pipeline before
//! the engine is ever called.

use std::path::{Path, PathBuf};

use regcheck_core::{ClosureError, ExitStatus, ManifestError};
use thiserror::Error;

use crate::closure::check_closure;
use crate::config::HarnessConfig;
use crate::engine::ValidationEngine;
use crate::loader::DocumentLoader;
use crate::orchestrate::Orchestrator;
use crate::registry::RegistryBuilder;
use crate::report::RunReport;

/// A fatal error that aborted the run before validation.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The manifest could not produce a resolution universe.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The universe references unregistered ids.
    #[error(transparent)]
    Closure(#[from] ClosureError),
}

impl HarnessError {
    /// Fatal errors always map to the configuration-error exit status.
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::ConfigurationError
    }
}

/// Runs the full pipeline against a spec root.
pub struct Harness<'a, E: ValidationEngine> {
    spec_root: PathBuf,
    config: &'a HarnessConfig,
    engine: E,
    loader: &'a dyn DocumentLoader,
}

impl<'a, E: ValidationEngine> Harness<'a, E> {
    /// Create a harness over `spec_root`, where the manifest lives.
    pub fn new(
        spec_root: impl Into<PathBuf>,
        config: &'a HarnessConfig,
        engine: E,
        loader: &'a dyn DocumentLoader,
    ) -> Self {
        Self {
            spec_root: spec_root.into(),
            config,
            engine,
            loader,
        }
    }

    /// The spec root paths are reported relative to.
    pub fn spec_root(&self) -> &Path {
        &self.spec_root
    }

    /// Load, check closure, then validate every case.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Manifest`] or [`HarnessError::Closure`]; in either
    /// case no document has been validated.
    pub fn run(self) -> Result<RunReport, HarnessError> {
        let manifest_path = self.spec_root.join(&self.config.registry);
        let (_, universe) = RegistryBuilder::new(manifest_path, self.loader).load()?;
        check_closure(&universe)?;

        Ok(Orchestrator::new(&universe, self.engine, self.loader)
            .with_layout(self.config.layout())
            .with_root(&self.spec_root)
            .run())
    }
}
