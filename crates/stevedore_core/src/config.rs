//! Generator configuration and execution root resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// Environment variable overriding the execution root.
pub const ROOT_ENV_VAR: &str = "STEVEDORE_HOME";

/// Optional configuration file looked up in the execution root.
pub const CONFIG_FILE: &str = "stevedore.yaml";

/// Resolve the execution root.
///
/// Order: `explicit`, then `STEVEDORE_HOME`, then the directory containing
/// the running executable.
pub fn resolve_execution_root(explicit: Option<&Path>) -> CoreResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(value) = env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }

    let exe = env::current_exe().map_err(|e| CoreError::ExecutionRoot(e.to_string()))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| CoreError::ExecutionRoot(format!("{} has no parent", exe.display())))
}

/// Where templates are read from and artifacts are written to.
///
/// Relative paths are resolved against the execution root. The fields other
/// than the root can be overridden by a `stevedore.yaml` in the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    #[serde(skip)]
    pub execution_root: PathBuf,
    /// Directory holding `docker/` and `docker-compose/` templates.
    pub templates_dir: PathBuf,
    /// Dockerfile template, relative to `<templates_dir>/docker`.
    pub dockerfile_template: PathBuf,
    /// Compose template, relative to `<templates_dir>/docker-compose`.
    pub compose_template: PathBuf,
    pub output_dir: PathBuf,
    /// Default descriptors root for discovery.
    pub descriptors_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            execution_root: PathBuf::new(),
            templates_dir: PathBuf::from("templates"),
            dockerfile_template: PathBuf::from("Dockerfile.template"),
            compose_template: PathBuf::from("docker-compose.yml.template"),
            output_dir: PathBuf::from("output"),
            descriptors_dir: PathBuf::from("deployments"),
        }
    }
}

impl GeneratorConfig {
    pub fn new(execution_root: impl Into<PathBuf>) -> Self {
        Self {
            execution_root: execution_root.into(),
            ..Default::default()
        }
    }

    /// Defaults overlaid with `<root>/stevedore.yaml` when present.
    pub fn load(execution_root: impl Into<PathBuf>) -> CoreResult<Self> {
        let execution_root = execution_root.into();
        let path = execution_root.join(CONFIG_FILE);

        if !path.is_file() {
            debug!("No {} in {}, using defaults", CONFIG_FILE, execution_root.display());
            return Ok(Self::new(execution_root));
        }

        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(&path)?;
        let mut config: GeneratorConfig = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| CoreError::Config {
                path: path.clone(),
                message: e.to_string(),
            })?
        };
        config.execution_root = execution_root;
        Ok(config)
    }

    pub fn with_dockerfile_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.dockerfile_template = template.into();
        self
    }

    pub fn with_compose_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.compose_template = template.into();
        self
    }

    fn templates_root(&self) -> PathBuf {
        self.execution_root.join(&self.templates_dir)
    }

    fn output_root(&self) -> PathBuf {
        self.execution_root.join(&self.output_dir)
    }

    /// `<root>/templates/docker/<dockerfile_template>`
    pub fn dockerfile_template_path(&self) -> PathBuf {
        self.templates_root().join("docker").join(&self.dockerfile_template)
    }

    /// `<root>/templates/docker-compose/<compose_template>`
    pub fn compose_template_path(&self) -> PathBuf {
        self.templates_root()
            .join("docker-compose")
            .join(&self.compose_template)
    }

    /// `<root>/output/docker`
    pub fn dockerfile_output_root(&self) -> PathBuf {
        self.output_root().join("docker")
    }

    /// `<root>/output/docker-compose`
    pub fn compose_output_root(&self) -> PathBuf {
        self.output_root().join("docker-compose")
    }

    pub fn descriptors_root(&self) -> PathBuf {
        self.execution_root.join(&self.descriptors_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout() {
        let config = GeneratorConfig::new("/srv/stevedore");

        assert_eq!(
            config.dockerfile_template_path(),
            PathBuf::from("/srv/stevedore/templates/docker/Dockerfile.template")
        );
        assert_eq!(
            config.compose_template_path(),
            PathBuf::from("/srv/stevedore/templates/docker-compose/docker-compose.yml.template")
        );
        assert_eq!(
            config.dockerfile_output_root(),
            PathBuf::from("/srv/stevedore/output/docker")
        );
        assert_eq!(
            config.compose_output_root(),
            PathBuf::from("/srv/stevedore/output/docker-compose")
        );
        assert_eq!(
            config.descriptors_root(),
            PathBuf::from("/srv/stevedore/deployments")
        );
    }

    #[test]
    fn test_absolute_template_override() {
        let config = GeneratorConfig::new("/srv/stevedore")
            .with_dockerfile_template("/tmp/custom/Dockerfile.tera");
        assert_eq!(
            config.dockerfile_template_path(),
            PathBuf::from("/tmp/custom/Dockerfile.tera")
        );
    }

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_execution_root(Some(Path::new("/opt/root"))).unwrap();
        assert_eq!(root, PathBuf::from("/opt/root"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = GeneratorConfig::load(temp.path()).unwrap();
        assert_eq!(config, GeneratorConfig::new(temp.path()));
    }

    #[test]
    fn test_load_overlays_file() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "outputDir: build\ncomposeTemplate: compose.tera\n",
        )
        .unwrap();

        let config = GeneratorConfig::load(temp.path()).unwrap();
        assert_eq!(config.execution_root, temp.path());
        assert_eq!(config.output_dir, PathBuf::from("build"));
        assert_eq!(config.compose_template, PathBuf::from("compose.tera"));
        assert_eq!(config.dockerfile_template, PathBuf::from("Dockerfile.template"));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "outputDir: [nope").unwrap();

        let err = GeneratorConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
