//! Template compilation and rendering to files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};

use crate::error::{describe, TemplateError, TemplateResult};
use crate::helpers::register_helpers;

const INLINE_TEMPLATE: &str = "__inline__";

/// Renders Tera templates against serializable data.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    autoescape: bool,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a renderer. Output is written verbatim, without HTML escaping.
    pub fn new() -> Self {
        Self { autoescape: false }
    }

    /// Escape HTML in substituted values.
    pub fn with_autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }

    /// Render `template_path` against `data` into `output_path`.
    ///
    /// The template is compiled before anything touches the filesystem, so a
    /// template that fails to compile leaves no output behind. A failure
    /// during execution may leave a truncated file.
    pub fn render<T: Serialize + ?Sized>(
        &self,
        template_path: &Path,
        output_path: &Path,
        data: &T,
    ) -> TemplateResult<PathBuf> {
        info!("Applying template {}", template_path.display());

        if !template_path.is_file() {
            return Err(TemplateError::NotFound(template_path.to_path_buf()));
        }

        let name = template_path.to_string_lossy().into_owned();
        let mut tera = self.engine();
        tera.add_template_file(template_path, Some(name.as_str()))
            .map_err(|e| TemplateError::Compile {
                template: template_path.to_path_buf(),
                message: describe(&e),
            })?;

        let context = build_context(data)?;

        if let Some(parent) = output_path.parent() {
            create_output_dir(parent)?;
        }

        let file = File::create(output_path).map_err(|source| TemplateError::CreateOutput {
            path: output_path.to_path_buf(),
            source,
        })?;
        info!("Creating file: {}", output_path.display());

        let mut writer = BufWriter::new(file);
        tera.render_to(&name, &context, &mut writer)
            .map_err(|e| TemplateError::Render {
                template: template_path.to_path_buf(),
                message: describe(&e),
            })?;
        writer.flush()?;

        Ok(output_path.to_path_buf())
    }

    /// Render template source held in memory.
    pub fn render_str<T: Serialize + ?Sized>(&self, source: &str, data: &T) -> TemplateResult<String> {
        let mut tera = self.engine();
        tera.add_raw_template(INLINE_TEMPLATE, source)
            .map_err(|e| TemplateError::Compile {
                template: PathBuf::from(INLINE_TEMPLATE),
                message: describe(&e),
            })?;

        let context = build_context(data)?;
        tera.render(INLINE_TEMPLATE, &context)
            .map_err(|e| TemplateError::Render {
                template: PathBuf::from(INLINE_TEMPLATE),
                message: describe(&e),
            })
    }

    fn engine(&self) -> Tera {
        let mut tera = Tera::default();
        // Tera matches escaping by template name suffix; "" matches every name.
        tera.autoescape_on(if self.autoescape { vec![""] } else { vec![] });
        register_helpers(&mut tera);
        tera
    }
}

/// Top-level fields of `data` become template variables.
fn build_context<T: Serialize + ?Sized>(data: &T) -> TemplateResult<Context> {
    let value = serde_json::to_value(data)?;
    if !value.is_object() {
        return Err(TemplateError::InvalidContext(kind_of(&value).to_string()));
    }
    Context::from_value(value).map_err(|e| TemplateError::InvalidContext(describe(&e)))
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a map",
    }
}

/// Create `dir` and its ancestors, open to the owning process.
fn create_output_dir(dir: &Path) -> TemplateResult<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    debug!("Creating directory {}", dir.display());

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder
        .create(dir)
        .map_err(|source| TemplateError::CreateOutput {
            path: dir.to_path_buf(),
            source,
        })
}
