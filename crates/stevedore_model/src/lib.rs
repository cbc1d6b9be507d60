//! # stevedore_model
//!
//! Deployment descriptor model and loader for stevedore.
//!
//! A descriptor is a YAML document describing one deployment: its metadata
//! and an ordered list of components with their ports, databases,
//! dependencies and health check. The types in [`models`] are plain serde
//! records; they are what the loader produces and also what templates see.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stevedore_model::DescriptorReader;
//!
//! let deployment = DescriptorReader::load("deployments/shop/deployment.yaml").unwrap();
//! for component in &deployment.components {
//!     println!("{} -> {}", component.name, component.effective_code_name());
//! }
//! ```

pub mod error;
pub mod models;
pub mod reader;

pub use error::{ModelError, ModelResult};
pub use models::*;
pub use reader::DescriptorReader;
