//! # stevedore_templates
//!
//! Template rendering for stevedore.
//!
//! Templates are [Tera](https://keats.github.io/tera/) files. A template is
//! compiled on every render, executed against any serializable value and
//! streamed into its output file. Parent directories of the output are
//! created on demand.
//!
//! Helpers available inside templates:
//!
//! - `is_last(index, items)`: true when `index` is the last index of
//!   `items`, for separator placement in list syntax.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stevedore_templates::TemplateRenderer;
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! let renderer = TemplateRenderer::new();
//! let data = BTreeMap::from([("name", "api")]);
//! renderer
//!     .render(
//!         Path::new("templates/docker/Dockerfile.template"),
//!         Path::new("output/docker/api/Dockerfile"),
//!         &data,
//!     )
//!     .unwrap();
//! ```

pub mod error;
pub mod helpers;
pub mod renderer;

pub use error::{TemplateError, TemplateResult};
pub use helpers::{is_last, register_helpers};
pub use renderer::TemplateRenderer;
