//! Error types for the core module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that stop a generation run.
///
/// Template failures are not in here: they are logged and collected in the
/// [`GenerationReport`](crate::GenerationReport) instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] stevedore_model::ModelError),

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Cannot resolve execution root: {0}")]
    ExecutionRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the run failed because a descriptor could not be read or parsed.
    pub fn is_descriptor_error(&self) -> bool {
        matches!(self, Self::Descriptor(_))
    }
}
