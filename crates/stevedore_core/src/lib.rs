//! # stevedore_core
//!
//! Artifact generation pipeline for stevedore.
//!
//! # Architecture
//!
//! - **Config**: execution root resolution and the template/output layout
//! - **Generator**: one descriptor in, Dockerfiles and a compose file out
//! - **Discovery**: runs the generator over every file in a descriptor tree
//!
//! # Example
//!
//! ```rust,no_run
//! use stevedore_core::{discover_and_generate, resolve_execution_root, Generator, GeneratorConfig};
//!
//! let root = resolve_execution_root(None)?;
//! let config = GeneratorConfig::load(&root)?;
//! let descriptors = config.descriptors_root();
//! let generator = Generator::new(config);
//!
//! let summary = discover_and_generate(&generator, &descriptors)?;
//! println!("{} file(s) written", summary.written().count());
//! # Ok::<(), stevedore_core::CoreError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;

pub use config::{resolve_execution_root, GeneratorConfig, CONFIG_FILE, ROOT_ENV_VAR};
pub use discovery::{discover_and_generate, DiscoverySummary};
pub use error::{CoreError, CoreResult};
pub use generator::{
    GenerationReport, Generator, RenderFailure, SkippedComponent, COMPOSE_FILE_NAME,
    DOCKERFILE_NAME,
};
pub use stevedore_model::SkipReason;
