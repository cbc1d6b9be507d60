//! stevedore CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success (render failures are logged, not fatal)
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Descriptor could not be read or parsed
//! - 4: Render failures with `--strict`

use std::process::ExitCode;

use clap::Parser;
use stevedore_core::CoreError;
use stevedore_model::ModelError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands, RenderFailures};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const DESCRIPTOR_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_json);

    let result = match &cli.command {
        Commands::Discover(args) => commands::discover::execute(&cli, args),
        Commands::Generate(args) => commands::generate::execute(&cli, args),
        Commands::Inspect(args) => commands::inspect::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Logs go to stderr so that `inspect` output stays clean on stdout.
fn init_logging(verbose: bool, quiet: bool, json: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stevedore={},warn", level)));

    // Already initialized is fine.
    let _ = tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .with(filter)
        .try_init();
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.is::<ModelError>() {
            return ExitCodes::DESCRIPTOR_ERROR;
        }
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            if core.is_descriptor_error() {
                return ExitCodes::DESCRIPTOR_ERROR;
            }
        }
        if cause.is::<RenderFailures>() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
