//! Descriptor file reading.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ModelError, ModelResult};
use crate::models::Deployment;

/// Reader for deployment descriptors.
pub struct DescriptorReader;

impl DescriptorReader {
    /// Read and parse the descriptor at `path`.
    ///
    /// Callers treat any error here as fatal: generation cannot proceed
    /// without a valid deployment model.
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Deployment> {
        let path = path.as_ref();
        info!("Reading deployment: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let deployment = parse_content(&content).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Loaded deployment {} with {} component(s)",
            deployment.effective_code_name(),
            deployment.components.len()
        );
        Ok(deployment)
    }

    /// Parse descriptor content held in memory.
    pub fn parse(content: &str) -> ModelResult<Deployment> {
        Ok(parse_content(content)?)
    }
}

fn parse_content(content: &str) -> Result<Deployment, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Deployment::default());
    }
    serde_yaml::from_str(content)
}
