//! # Check Subcommand
//!
//! Runs the full harness: registry, closure check, then every example and
//! invalid case. The report is written to `out`; fatal errors to `err`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use regcheck_schema::{FsLoader, Harness, HarnessConfig, JsonSchemaEngine};

/// Options shared by every subcommand that loads the registry.
#[derive(Args, Debug, Clone, Default)]
pub struct RegistryArgs {
    /// Manifest file, relative to the spec root.
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

impl RegistryArgs {
    /// Fold command-line overrides into `config`.
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(registry) = &self.registry {
            config.registry = registry.clone();
        }
    }
}

/// Report rendering.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable per-case lines and a summary.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

/// Arguments for `regcheck check`.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Violations listed per failing case.
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CheckArgs {
    /// Fold command-line overrides into `config`.
    pub fn apply(&self, config: &mut HarnessConfig) {
        self.registry.apply(config);
        if let Some(n) = self.max_errors {
            config.max_errors_per_case = n;
        }
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if every case passed, 1 if any case failed,
/// 2 on a manifest or closure error. An `Err` means the report could
/// not be written.
pub fn run_check(
    args: &CheckArgs,
    spec_root: &Path,
    config: &HarnessConfig,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    tracing::debug!(spec_root = %spec_root.display(), "running harness");

    let report = match Harness::new(spec_root, config, JsonSchemaEngine::new(), &FsLoader).run() {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("harness aborted before validation");
            writeln!(err, "ERROR: {e}")?;
            return Ok(e.exit_status().code());
        }
    };

    match args.format {
        OutputFormat::Text => write!(out, "{}", report.render_text(config.max_errors_per_case))?,
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
    }

    Ok(report.exit_status().code())
}
