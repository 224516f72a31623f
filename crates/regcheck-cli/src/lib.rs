//! # regcheck-cli — Command-Line Interface for the Schema Harness
//!
//! Provides the `regcheck` binary.
//!
//! ## Subcommands
//!
//! - `regcheck check` — closure check, then validate every example and
//!   invalid case. Exit code 0 (all passed), 1 (a case failed), or
//!   2 (manifest or closure error).
//! - `regcheck closure` — closure check only, listing the reference graph.
//!
//! A subcommand that cannot write its report (closed stdout, serialization
//! failure) exits with 2, the same code as a manifest or closure error.
//! Exit code 1 only ever means a case failed.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; behavior lives in `regcheck-schema`.
//! - The report goes to stdout, fatal errors and logs to stderr, so the
//!   report stays byte-identical between runs.

pub mod check;
pub mod closure;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regcheck_schema::HarnessConfig;

/// Directory conventionally holding the registry and schema groups.
pub const SPEC_DIR_NAME: &str = "spec";

/// Exit code for operational failures: bad configuration, a manifest or
/// closure error, or a report that could not be written.
pub const EXIT_OPERATIONAL_ERROR: u8 = 2;

/// Map a subcommand result to the process exit code.
pub fn exit_code(result: &Result<u8>) -> u8 {
    match result {
        Ok(code) => *code,
        Err(_) => EXIT_OPERATIONAL_ERROR,
    }
}

/// Load configuration from `path`, or the defaults if none was given.
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    match path {
        Some(p) => HarnessConfig::from_yaml_file(p)
            .with_context(|| format!("failed to load configuration from {}", p.display())),
        None => Ok(HarnessConfig::default()),
    }
}

/// Walk up from `start` to the first `spec/` directory holding `registry`.
pub fn find_spec_root(start: &Path, registry: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(SPEC_DIR_NAME);
        if candidate.join(registry).is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Use `explicit` if given, else discover from the current directory,
/// else fall back to the current directory.
pub fn resolve_spec_root(explicit: Option<&Path>, registry: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_spec_root(&cwd, registry).unwrap_or_else(|| {
        tracing::warn!("could not locate a spec/ directory; using current directory");
        cwd
    })
}
