//! Descriptor to artifact generation.
//!
//! One [`Generator::generate`] call handles one descriptor:
//!
//! 1. Load the deployment. Failure here is returned to the caller.
//! 2. Render a Dockerfile for every component that
//!    [`Deployment::dockerfile_plan`] does not skip.
//! 3. Render one compose file for the whole deployment, at a path that
//!    mirrors the descriptor's position under the descriptors root.
//!
//! Render failures in steps 2 and 3 are logged and recorded in the
//! [`GenerationReport`]; they never abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use stevedore_model::{Deployment, DescriptorReader, SkipReason};
use stevedore_templates::TemplateRenderer;

use crate::config::GeneratorConfig;
use crate::error::CoreResult;

pub const DOCKERFILE_NAME: &str = "Dockerfile";
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedComponent {
    pub name: String,
    pub code_name: String,
    pub reason: SkipReason,
}

/// A template that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub template: PathBuf,
    pub output: PathBuf,
    pub message: String,
}

/// Outcome of generating one descriptor.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub descriptor: PathBuf,
    /// Effective code name of the deployment.
    pub deployment: String,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedComponent>,
    pub failures: Vec<RenderFailure>,
}

impl GenerationReport {
    /// No render failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders deployment artifacts under the configured execution root.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    renderer: TemplateRenderer,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Load `descriptor_path` and render its artifacts.
    pub fn generate(
        &self,
        descriptors_root: &Path,
        descriptor_path: &Path,
    ) -> CoreResult<GenerationReport> {
        let deployment = DescriptorReader::load(descriptor_path)?;
        Ok(self.generate_deployment(&deployment, descriptors_root, descriptor_path))
    }

    /// Render artifacts for an already loaded deployment.
    pub fn generate_deployment(
        &self,
        deployment: &Deployment,
        descriptors_root: &Path,
        descriptor_path: &Path,
    ) -> GenerationReport {
        let mut report = GenerationReport {
            descriptor: descriptor_path.to_path_buf(),
            deployment: deployment.effective_code_name().to_string(),
            ..Default::default()
        };

        let dockerfile_template = self.config.dockerfile_template_path();

        for (component, skip) in deployment.dockerfile_plan() {
            let code_name = component.effective_code_name();
            if let Some(reason) = skip {
                if reason == SkipReason::Unnamed {
                    warn!(
                        "Component without name or code name in {}, skipping Dockerfile",
                        descriptor_path.display()
                    );
                } else {
                    debug!("Skipping Dockerfile for {}: {}", code_name, reason);
                }
                report.skipped.push(SkippedComponent {
                    name: component.name.clone(),
                    code_name: code_name.to_string(),
                    reason,
                });
                continue;
            }

            let output = self.dockerfile_output_path(code_name);
            self.apply(&dockerfile_template, &output, component, &mut report);
        }

        let compose_output = self.compose_output_path(descriptors_root, descriptor_path);
        self.apply(
            &self.config.compose_template_path(),
            &compose_output,
            deployment,
            &mut report,
        );

        info!(
            "Generated {} file(s) for {} ({} skipped, {} failed)",
            report.written.len(),
            report.deployment,
            report.skipped.len(),
            report.failures.len()
        );
        report
    }

    /// `<root>/output/docker/<code_name>/Dockerfile`
    pub fn dockerfile_output_path(&self, code_name: &str) -> PathBuf {
        self.config
            .dockerfile_output_root()
            .join(code_name)
            .join(DOCKERFILE_NAME)
    }

    /// `<root>/output/docker-compose/<descriptor dir relative to descriptors_root>/docker-compose.yml`
    pub fn compose_output_path(&self, descriptors_root: &Path, descriptor_path: &Path) -> PathBuf {
        let relative = relative_sub_path(descriptors_root, descriptor_path);
        let mut path = self.config.compose_output_root();
        if !relative.as_os_str().is_empty() {
            path.push(relative);
        }
        path.join(COMPOSE_FILE_NAME)
    }

    fn apply<T: Serialize + ?Sized>(
        &self,
        template: &Path,
        output: &Path,
        data: &T,
        report: &mut GenerationReport,
    ) {
        match self.renderer.render(template, output, data) {
            Ok(path) => report.written.push(path),
            Err(e) => {
                error!("Error rendering {}: {}", output.display(), e);
                report.failures.push(RenderFailure {
                    template: template.to_path_buf(),
                    output: output.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Directory of `descriptor_path` with the `descriptors_root` prefix removed.
///
/// Falls back to canonical paths when the two are spelled differently
/// (`./deployments` vs `deployments`). A descriptor outside the root maps to
/// the empty path.
fn relative_sub_path(descriptors_root: &Path, descriptor_path: &Path) -> PathBuf {
    let parent = descriptor_path.parent().unwrap_or_else(|| Path::new(""));

    if let Ok(relative) = parent.strip_prefix(descriptors_root) {
        return relative.to_path_buf();
    }

    if let (Ok(parent), Ok(root)) = (fs::canonicalize(parent), fs::canonicalize(descriptors_root)) {
        if let Ok(relative) = parent.strip_prefix(&root) {
            return relative.to_path_buf();
        }
    }

    warn!(
        "{} is not under {}, writing compose file at the output root",
        descriptor_path.display(),
        descriptors_root.display()
    );
    PathBuf::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> Generator {
        Generator::new(GeneratorConfig::new("/work"))
    }

    #[test]
    fn test_dockerfile_output_path() {
        assert_eq!(
            generator().dockerfile_output_path("shop-api"),
            PathBuf::from("/work/output/docker/shop-api/Dockerfile")
        );
    }

    #[test]
    fn test_compose_path_mirrors_descriptor_tree() {
        let path = generator().compose_output_path(
            Path::new("/work/deployments"),
            Path::new("/work/deployments/teamA/sub/deploy.yaml"),
        );
        assert_eq!(
            path,
            PathBuf::from("/work/output/docker-compose/teamA/sub/docker-compose.yml")
        );
    }

    #[test]
    fn test_compose_path_for_descriptor_at_root() {
        let path = generator().compose_output_path(
            Path::new("/work/deployments"),
            Path::new("/work/deployments/deploy.yaml"),
        );
        assert_eq!(path, PathBuf::from("/work/output/docker-compose/docker-compose.yml"));
    }

    #[test]
    fn test_compose_path_outside_root() {
        let path = generator().compose_output_path(
            Path::new("/work/deployments"),
            Path::new("/elsewhere/nonexistent/deploy.yaml"),
        );
        assert_eq!(path, PathBuf::from("/work/output/docker-compose/docker-compose.yml"));
    }
}
