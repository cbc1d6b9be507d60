//! Generate command - Generate artifacts for one descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use super::{build_generator, print_report, Cli, RenderFailures};

#[derive(Args)]
pub struct GenerateArgs {
    /// Descriptor file
    descriptor: PathBuf,

    /// Root the compose output path is computed against
    /// (defaults to <root>/deployments when the descriptor lives there,
    /// else the descriptor's own directory)
    #[arg(short, long)]
    descriptors: Option<PathBuf>,

    /// Exit with code 4 if any artifact failed to render
    #[arg(long)]
    strict: bool,
}

pub fn execute(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let generator = build_generator(cli)?;
    let descriptors = args.descriptors.clone().unwrap_or_else(|| {
        default_descriptors_root(&generator.config().descriptors_root(), &args.descriptor)
    });

    let report = generator.generate(&descriptors, &args.descriptor)?;
    print_report(&report, cli.quiet);

    if args.strict && !report.is_clean() {
        return Err(RenderFailures {
            count: report.failures.len(),
        }
        .into());
    }
    Ok(())
}

/// `configured` when the descriptor lives under it, else the descriptor's
/// own directory. Both paths are canonicalized so that a relative descriptor
/// path is matched against an absolute root.
fn default_descriptors_root(configured: &Path, descriptor: &Path) -> PathBuf {
    let under_configured = match (fs::canonicalize(configured), fs::canonicalize(descriptor)) {
        (Ok(root), Ok(descriptor)) => descriptor.starts_with(root),
        _ => descriptor.starts_with(configured),
    };

    if under_configured {
        configured.to_path_buf()
    } else {
        descriptor.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}
