//! Error types for templates.

use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while rendering a template.
///
/// None of these are fatal to a generation run: the caller logs them and
/// moves on to the next artifact.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(PathBuf),

    #[error("Template {template} failed to compile: {message}")]
    Compile { template: PathBuf, message: String },

    #[error("Template {template} failed to render: {message}")]
    Render { template: PathBuf, message: String },

    #[error("Template context must be a map, got {0}")]
    InvalidContext(String),

    #[error("Error creating {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flatten a Tera error and its causes into one line.
///
/// Tera keeps the useful part (line, column, offending variable) in the
/// source chain rather than in the top-level message.
pub(crate) fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
