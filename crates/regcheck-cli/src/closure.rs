//! # Closure Subcommand
//!
//! Loads the registry and checks reference closure without validating any
//! document. Prints each referenced id with the schemas that reference it.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use regcheck_schema::{check_closure, reference_graph, FsLoader, HarnessConfig, HarnessError, RegistryBuilder};

use crate::check::RegistryArgs;

/// Arguments for `regcheck closure`.
#[derive(Args, Debug, Clone, Default)]
pub struct ClosureArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Execute the closure subcommand.
///
/// Returns exit code 0 if the registry is closed, 2 otherwise.
pub fn run_closure(
    _args: &ClosureArgs,
    spec_root: &Path,
    config: &HarnessConfig,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    let builder = RegistryBuilder::new(spec_root.join(&config.registry), &FsLoader);
    let universe = match builder.load() {
        Ok((_, universe)) => universe,
        Err(e) => {
            let e = HarnessError::from(e);
            writeln!(err, "ERROR: {e}")?;
            return Ok(e.exit_status().code());
        }
    };

    for (target, referrers) in reference_graph(&universe) {
        let marker = if universe.contains(&target) { "✅" } else { "❌" };
        let by: Vec<&str> = referrers.iter().map(|id| id.as_str()).collect();
        writeln!(out, "{marker} {target} <- {}", by.join(", "))?;
    }

    match check_closure(&universe) {
        Ok(()) => {
            writeln!(out, "\nClosure OK: {} schema(s) registered.", universe.len())?;
            Ok(0)
        }
        Err(e) => {
            let e = HarnessError::from(e);
            writeln!(err, "ERROR: {e}")?;
            Ok(e.exit_status().code())
        }
    }
}
