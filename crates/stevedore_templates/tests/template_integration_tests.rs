//! Integration tests for rendering the bundled templates.

use std::fs;
use std::path::PathBuf;

use stevedore_model::{Component, DescriptorReader, Healthcheck, Probe};
use stevedore_templates::{TemplateError, TemplateRenderer};
use tempfile::tempdir;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn dockerfile_template() -> PathBuf {
    workspace_root().join("templates/docker/Dockerfile.template")
}

fn compose_template() -> PathBuf {
    workspace_root().join("templates/docker-compose/docker-compose.yml.template")
}

fn sample() -> stevedore_model::Deployment {
    DescriptorReader::load(workspace_root().join("deployments/shop/deployment.yaml")).unwrap()
}

#[test]
fn test_dockerfile_for_http_component() {
    let deployment = sample();
    let api = deployment.component("shop-api").unwrap();
    let temp = tempdir().unwrap();
    let output = temp.path().join("docker/shop-api/Dockerfile");

    TemplateRenderer::new()
        .render(&dockerfile_template(), &output, api)
        .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("FROM eclipse-temurin:21-jre"));
    assert!(content.contains("ENV SPRING_PROFILES_ACTIVE=\"docker\""));
    assert!(content.contains("EXPOSE 8080"));
    assert!(content.contains("http://localhost:8080/actuator/health"));
    assert!(content.contains("--start-period=20s"));
    assert!(content.contains("ENTRYPOINT java -jar /app/shop-api.jar"));
}

#[test]
fn test_dockerfile_command_probe_uses_separators() {
    let component = Component {
        name: "cache".to_string(),
        distribution: "redis:7".to_string(),
        entrypoint: "redis-server".to_string(),
        healthcheck: Healthcheck {
            probe: Probe::Command {
                command: vec!["redis-cli".into(), "ping".into()],
            },
            period_seconds: 7,
            ..Default::default()
        },
        ..Default::default()
    };
    let temp = tempdir().unwrap();
    let output = temp.path().join("Dockerfile");

    TemplateRenderer::new()
        .render(&dockerfile_template(), &output, &component)
        .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("HEALTHCHECK --interval=7s CMD [\"redis-cli\", \"ping\"]"));
}

#[test]
fn test_compose_lists_every_component() {
    let deployment = sample();
    let temp = tempdir().unwrap();
    let output = temp.path().join("docker-compose.yml");

    TemplateRenderer::new()
        .render(&compose_template(), &output, &deployment)
        .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("# Web Shop 1.4.0"));
    assert!(content.contains("  shop-api:\n    build: ../docker/shop-api"));
    assert!(content.contains("  shop-db:\n    image: postgres:16-alpine"));
    assert!(content.contains("replicas: 2"));
    assert!(content.contains("ports: [\"8080:8080\"]"));
    assert!(content.contains("ports: [\"5432\"]"));
    assert!(content.contains("depends_on: [\"shop-db\"]"));
    assert!(content.contains("- ./data/uploads:/var/lib/shop/uploads"));
}

#[test]
fn test_rendering_is_deterministic() {
    let deployment = sample();
    let temp = tempdir().unwrap();
    let first = temp.path().join("first.yml");
    let second = temp.path().join("second.yml");

    let renderer = TemplateRenderer::new();
    renderer.render(&compose_template(), &first, &deployment).unwrap();
    renderer.render(&compose_template(), &second, &deployment).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_unknown_variable_is_a_render_error() {
    let temp = tempdir().unwrap();
    let template = temp.path().join("typo.template");
    fs::write(&template, "FROM {{ distributon }}").unwrap();

    let err = TemplateRenderer::new()
        .render(&template, &temp.path().join("Dockerfile"), &Component::default())
        .unwrap_err();

    assert!(matches!(err, TemplateError::Render { .. }));
    assert!(err.to_string().contains("distributon"));
}
