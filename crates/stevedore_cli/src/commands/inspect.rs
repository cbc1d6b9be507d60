//! Inspect command - Show a parsed descriptor.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use stevedore_model::DescriptorReader;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Descriptor file
    descriptor: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    format: Format,
}

pub fn execute(args: &InspectArgs) -> Result<()> {
    let deployment = DescriptorReader::load(&args.descriptor)?;

    let rendered = match args.format {
        Format::Yaml => serde_yaml::to_string(&deployment)?,
        Format::Json => serde_json::to_string_pretty(&deployment)?,
    };
    println!("{}", rendered.trim_end());

    Ok(())
}
