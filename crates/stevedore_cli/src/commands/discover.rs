//! Discover command - Generate artifacts for a whole descriptor tree.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use stevedore_core::discover_and_generate;

use super::{build_generator, print_report, Cli, RenderFailures};

#[derive(Args)]
pub struct DiscoverArgs {
    /// Descriptors directory (defaults to <root>/deployments)
    #[arg(short, long)]
    descriptors: Option<PathBuf>,

    /// Exit with code 4 if any artifact failed to render
    #[arg(long)]
    strict: bool,
}

pub fn execute(cli: &Cli, args: &DiscoverArgs) -> Result<()> {
    let generator = build_generator(cli)?;
    let descriptors = args
        .descriptors
        .clone()
        .unwrap_or_else(|| generator.config().descriptors_root());

    info!("Running discovery in {}", descriptors.display());
    let summary = discover_and_generate(&generator, &descriptors)?;

    for report in &summary.reports {
        print_report(report, cli.quiet);
    }
    for error in &summary.traversal_errors {
        println!("⚠️  {}", error);
    }

    let failures = summary.failure_count();
    println!(
        "\nResults: {} descriptor(s), {} file(s) written, {} failed",
        summary.descriptors(),
        summary.written().count(),
        failures
    );

    if args.strict && failures > 0 {
        return Err(RenderFailures { count: failures }.into());
    }
    Ok(())
}
