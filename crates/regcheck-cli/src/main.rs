//! # regcheck CLI entry point
//!
//! Parses command-line arguments, initializes tracing, resolves the spec
//! root, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regcheck_cli::check::{run_check, CheckArgs};
use regcheck_cli::closure::{run_closure, ClosureArgs};
use regcheck_cli::{exit_code, load_config, resolve_spec_root, EXIT_OPERATIONAL_ERROR};

/// Schema-compliance harness.
///
/// Verifies that every `$ref` in a schema registry resolves within the
/// registry, then validates each schema's examples (which must pass) and
/// invalid cases (which must fail).
#[derive(Parser, Debug)]
#[command(name = "regcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the registry; discovered by walking up to a
    /// `spec/` directory when omitted.
    #[arg(long, global = true)]
    spec_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check reference closure, then validate all examples and invalid cases.
    Check(CheckArgs),

    /// Check reference closure only and print the reference graph.
    Closure(ClosureArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            return ExitCode::from(EXIT_OPERATIONAL_ERROR);
        }
    };
    match &cli.command {
        Commands::Check(args) => args.apply(&mut config),
        Commands::Closure(args) => args.registry.apply(&mut config),
    }

    let spec_root = resolve_spec_root(cli.spec_dir.as_deref(), &config.registry);
    tracing::debug!(spec_root = %spec_root.display(), "resolved spec root");

    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    let result = match &cli.command {
        Commands::Check(args) => run_check(args, &spec_root, &config, &mut out, &mut err),
        Commands::Closure(args) => run_closure(args, &spec_root, &config, &mut out, &mut err),
    };

    if let Err(e) = &result {
        tracing::error!("{e:#}");
    }
    ExitCode::from(exit_code(&result))
}
