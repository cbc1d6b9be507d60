//! Data models for deployment descriptors.
//!
//! Every field is optional in the YAML document and falls back to its zero
//! value. Unknown keys are ignored so that newer descriptors still load.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

/// One descriptor file's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Machine-safe identifier.
    pub code_name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    /// Free-form annotations, ordered by key.
    #[serde(deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub components: Vec<Component>,
}

impl Deployment {
    /// Code name if set, display name otherwise.
    pub fn effective_code_name(&self) -> &str {
        non_empty_or(&self.code_name, &self.name)
    }

    /// Look up a component by its effective code name. First match wins.
    pub fn component(&self, code_name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.effective_code_name() == code_name)
    }

    /// Every component in declaration order, paired with the reason it gets
    /// no Dockerfile (`None` when it needs one).
    ///
    /// A code name is claimed by the first buildable component that carries
    /// it; later components with the same code name are duplicates. Components
    /// backed by a pre-built image never claim their code name.
    pub fn dockerfile_plan(&self) -> Vec<(&Component, Option<SkipReason>)> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.components
            .iter()
            .map(|component| {
                let code_name = component.effective_code_name();
                let skip = if seen.contains(code_name) {
                    Some(SkipReason::Duplicate)
                } else if let Some(image) = component.prebuilt_image() {
                    Some(SkipReason::PrebuiltImage(image.to_string()))
                } else if code_name.is_empty() {
                    Some(SkipReason::Unnamed)
                } else {
                    seen.insert(code_name);
                    None
                };
                (component, skip)
            })
            .collect()
    }
}

/// Why a component produced no Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// An earlier component with the same code name already produced one.
    Duplicate,
    /// The component ships as this pre-built image.
    PrebuiltImage(String),
    /// Neither code name nor name is set, so there is no output directory.
    Unnamed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate code name"),
            Self::PrebuiltImage(image) => write!(f, "pre-built image {}", image),
            Self::Unnamed => write!(f, "no code name"),
        }
    }
}

/// One deployable unit within a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Component {
    pub name: String,
    pub code_name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(deserialize_with = "scalar_string")]
    pub cpu: String,
    #[serde(deserialize_with = "scalar_string")]
    pub memory: String,
    #[serde(deserialize_with = "scalar_string")]
    pub disk: String,
    /// Base OS distribution, e.g. `alpine:3.19`.
    pub distribution: String,
    pub entrypoint: String,
    /// Pre-built image reference. When set, no Dockerfile is generated.
    pub image: Option<String>,
    pub replicas: u32,
    pub scalable: bool,
    pub clustering: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub environment: Vec<EnvVar>,
    #[serde(deserialize_with = "null_as_default")]
    pub volumes: Vec<Volume>,
    #[serde(deserialize_with = "null_as_default")]
    pub ports: Vec<Port>,
    #[serde(deserialize_with = "null_as_default")]
    pub databases: Vec<Database>,
    #[serde(deserialize_with = "null_as_default")]
    pub dependencies: Vec<Dependency>,
    /// Also read from the legacy `livenessProbe` key. Giving both keys is a
    /// duplicate field error.
    #[serde(alias = "livenessProbe", deserialize_with = "null_as_default")]
    pub healthcheck: Healthcheck,
}

impl Component {
    /// Code name if set, name otherwise.
    pub fn effective_code_name(&self) -> &str {
        non_empty_or(&self.code_name, &self.name)
    }

    /// Image reference when the component is supplied as an external image.
    pub fn prebuilt_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|image| !image.trim().is_empty())
    }
}

/// Environment variable declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvVar {
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
}

/// Volume mount declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub name: String,
    /// Host path or named volume.
    pub source: String,
    /// Mount point inside the container.
    pub target: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Port {
    pub name: String,
    pub protocol: String,
    /// Container port.
    pub port: u16,
    pub host_port: Option<u16>,
    pub external: bool,
    pub session_affinity: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Database {
    pub name: String,
    /// Schema or seed script reference.
    pub create_script: String,
}

/// Reference to another component's code name and the ports used on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dependency {
    pub component: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ports: Vec<String>,
}

/// Health check: one probe mechanism plus shared timing.
///
/// Serialized for templates as a flat map with a `type` discriminator:
/// `{ type: httpGet, path: /health, port: 8080, initialDelaySeconds: 10, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Healthcheck {
    #[serde(flatten)]
    pub probe: Probe,
    pub initial_delay_seconds: u32,
    pub period_seconds: u32,
    pub timeout_seconds: u32,
}

/// Probe mechanism of a health check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Probe {
    #[default]
    None,
    Command { command: Vec<String> },
    TcpSocket { port: u16 },
    HttpGet { path: String, port: u16 },
}

impl<'de> Deserialize<'de> for Healthcheck {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawHealthcheck::deserialize(deserializer).map(Healthcheck::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ProbeKind {
    None,
    #[serde(alias = "exec")]
    Command,
    #[serde(alias = "tcp")]
    TcpSocket,
    #[serde(alias = "http")]
    HttpGet,
}

/// Input shape of a health check.
///
/// Accepts the explicit form (`type` plus flat probe fields) and the legacy
/// form where one of `exec`, `tcpSocket` or `httpGet` is populated and
/// carries its own timing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawHealthcheck {
    #[serde(rename = "type")]
    kind: Option<ProbeKind>,
    command: Vec<String>,
    path: String,
    port: u16,
    exec: Option<RawExec>,
    tcp_socket: Option<RawTcpSocket>,
    http_get: Option<RawHttpGet>,
    #[serde(flatten)]
    timing: RawTiming,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTiming {
    initial_delay_seconds: Option<u32>,
    period_seconds: Option<u32>,
    timeout_seconds: Option<u32>,
}

impl RawTiming {
    fn or(self, fallback: RawTiming) -> RawTiming {
        RawTiming {
            initial_delay_seconds: self.initial_delay_seconds.or(fallback.initial_delay_seconds),
            period_seconds: self.period_seconds.or(fallback.period_seconds),
            timeout_seconds: self.timeout_seconds.or(fallback.timeout_seconds),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawExec {
    command: Vec<String>,
    #[serde(flatten)]
    timing: RawTiming,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTcpSocket {
    port: u16,
    #[serde(flatten)]
    timing: RawTiming,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawHttpGet {
    path: String,
    port: u16,
    #[serde(flatten)]
    timing: RawTiming,
}

impl RawHealthcheck {
    /// Probe kind when no explicit `type` is given: the first populated
    /// legacy sub-record, then the flat fields. Order: httpGet, tcpSocket,
    /// command.
    fn inferred_kind(&self) -> ProbeKind {
        let http = self
            .http_get
            .as_ref()
            .is_some_and(|h| !h.path.is_empty() || h.port != 0);
        let tcp = self.tcp_socket.as_ref().is_some_and(|t| t.port != 0);
        let exec = self.exec.as_ref().is_some_and(|e| !e.command.is_empty());

        if http {
            ProbeKind::HttpGet
        } else if tcp {
            ProbeKind::TcpSocket
        } else if exec {
            ProbeKind::Command
        } else if !self.path.is_empty() {
            ProbeKind::HttpGet
        } else if self.port != 0 {
            ProbeKind::TcpSocket
        } else if !self.command.is_empty() {
            ProbeKind::Command
        } else {
            ProbeKind::None
        }
    }
}

impl From<RawHealthcheck> for Healthcheck {
    fn from(raw: RawHealthcheck) -> Self {
        let kind = raw.kind.unwrap_or_else(|| raw.inferred_kind());

        let (probe, legacy_timing) = match kind {
            ProbeKind::None => (Probe::None, RawTiming::default()),
            ProbeKind::Command => {
                let exec = raw.exec.unwrap_or_default();
                let command = if raw.command.is_empty() {
                    exec.command
                } else {
                    raw.command
                };
                (Probe::Command { command }, exec.timing)
            }
            ProbeKind::TcpSocket => {
                let tcp = raw.tcp_socket.unwrap_or_default();
                let port = if raw.port != 0 { raw.port } else { tcp.port };
                (Probe::TcpSocket { port }, tcp.timing)
            }
            ProbeKind::HttpGet => {
                let http = raw.http_get.unwrap_or_default();
                let path = if raw.path.is_empty() {
                    http.path
                } else {
                    raw.path
                };
                let port = if raw.port != 0 { raw.port } else { http.port };
                (Probe::HttpGet { path, port }, http.timing)
            }
        };

        let timing = raw.timing.or(legacy_timing);
        Healthcheck {
            probe,
            initial_delay_seconds: timing.initial_delay_seconds.unwrap_or_default(),
            period_seconds: timing.period_seconds.unwrap_or_default(),
            timeout_seconds: timing.timeout_seconds.unwrap_or_default(),
        }
    }
}

fn non_empty_or<'a>(preferred: &'a str, fallback: &'a str) -> &'a str {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

/// Treat an explicit `~`/`null` like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept any YAML scalar where a string is expected (`version: 1.2`,
/// `value: 8080`, `memory: 512`).
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}
