//! CLI command definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use stevedore_core::{
    resolve_execution_root, GenerationReport, Generator, GeneratorConfig, ROOT_ENV_VAR,
};

pub mod discover;
pub mod generate;
pub mod inspect;

/// stevedore - render Dockerfiles and compose files from deployment descriptors
#[derive(Parser)]
#[command(name = "stevedore")]
#[command(version, about = "stevedore - render Dockerfiles and compose files from deployment descriptors")]
#[command(long_about = r#"
stevedore reads deployment descriptors (YAML) and renders them through
templates into per-component Dockerfiles and one docker-compose file per
deployment.

LAYOUT (relative to the execution root):
  templates/docker/Dockerfile.template
  templates/docker-compose/docker-compose.yml.template
  deployments/...                      descriptors (discover)
  output/docker/<codeName>/Dockerfile
  output/docker-compose/<subdir>/docker-compose.yml

The execution root is --root, else $STEVEDORE_HOME, else the directory of
the stevedore executable.

EXIT CODES:
  0 - Success (render failures are logged)
  1 - General error
  2 - Invalid arguments
  3 - Descriptor could not be read or parsed
  4 - Render failures with --strict
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Execution root holding templates/ and output/
    #[arg(long, global = true, env = ROOT_ENV_VAR)]
    pub root: Option<PathBuf>,

    /// Dockerfile template, relative to templates/docker/
    #[arg(long, global = true)]
    pub dockerfile_template: Option<PathBuf>,

    /// Compose template, relative to templates/docker-compose/
    #[arg(long, global = true)]
    pub compose_template: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate artifacts for every descriptor under a directory tree
    Discover(discover::DiscoverArgs),

    /// Generate artifacts for a single descriptor
    Generate(generate::GenerateArgs),

    /// Print a descriptor as the templates see it
    Inspect(inspect::InspectArgs),
}

/// Raised under `--strict` when at least one artifact failed to render.
#[derive(Error, Debug)]
#[error("{count} artifact(s) failed to render")]
pub struct RenderFailures {
    pub count: usize,
}

/// Build a generator from the global options.
pub fn build_generator(cli: &Cli) -> Result<Generator> {
    let root = resolve_execution_root(cli.root.as_deref())?;
    debug!("Execution root: {}", root.display());

    let mut config = GeneratorConfig::load(&root)
        .with_context(|| format!("Failed to load configuration from {}", root.display()))?;
    if let Some(template) = &cli.dockerfile_template {
        config = config.with_dockerfile_template(template);
    }
    if let Some(template) = &cli.compose_template {
        config = config.with_compose_template(template);
    }

    Ok(Generator::new(config))
}

/// Print what one descriptor produced.
pub fn print_report(report: &GenerationReport, quiet: bool) {
    if !quiet {
        println!("📦 {} ({})", report.deployment, report.descriptor.display());
        for path in &report.written {
            println!("   ✅ {}", path.display());
        }
        for skipped in &report.skipped {
            println!("   ⏭️  {}: {}", skipped.code_name, skipped.reason);
        }
    }
    for failure in &report.failures {
        println!("   ❌ {}: {}", failure.output.display(), failure.message);
    }
}
