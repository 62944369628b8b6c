//! Ingress manifest model.
//!
//! Every nested structure is optional. Accessors apply the defaults the rewriters rely on:
//! a missing `metadata`, `annotations`, `spec`, `rules`, `http` or `paths` reads as empty,
//! a missing path reads as `"/"` and a missing path type reads as [`PathType::Prefix`].
//!
//! Manifests are never mutated after loading.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::config::null_as_default;

static NO_ANNOTATIONS: BTreeMap<String, String> = BTreeMap::new();

/// Path used when a path entry does not declare one.
pub const DEFAULT_PATH: &str = "/";

/// A routing manifest (Kubernetes `Ingress` shaped document).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// `apiVersion`, informational only.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Document kind. Absent kinds are treated as ingress documents.
    #[serde(default)]
    pub kind: Option<String>,

    /// Object metadata.
    #[serde(default)]
    pub metadata: Option<ObjectMeta>,

    /// Ingress spec.
    #[serde(default)]
    pub spec: Option<IngressSpec>,
}

/// The subset of object metadata the rewriters read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,

    /// Annotation map. Non-string scalar values are stringified, `null` values dropped.
    #[serde(default, deserialize_with = "lenient_annotations")]
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Ingress spec: class name and ordered rules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    #[serde(default)]
    pub ingress_class_name: Option<String>,

    #[serde(default)]
    pub rules: Option<Vec<IngressRule>>,
}

/// A host rule with its HTTP paths.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IngressRule {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub http: Option<HttpRuleValue>,
}

/// The `http` block of a rule.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HttpRuleValue {
    #[serde(default)]
    pub paths: Option<Vec<PathEntry>>,
}

/// One path of a rule and the backend it routes to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    #[serde(default)]
    pub path: Option<String>,

    /// Absent reads as [`PathType::Prefix`]; `null` or an unknown spelling is
    /// [`PathType::Unknown`].
    #[serde(default, deserialize_with = "lenient_path_type")]
    pub path_type: Option<PathType>,

    /// Backend reference. Opaque to the rewriters, interpreted by a
    /// [`BackendResolver`](crate::BackendResolver).
    #[serde(default)]
    pub backend: Option<IngressBackend>,
}

/// How a path is matched by the ingress controller.
///
/// Spellings are case-sensitive, as in Kubernetes. Anything else is `Unknown`, which no
/// rewriter treats as a prefix match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PathType {
    #[default]
    Prefix,
    Exact,
    ImplementationSpecific,
    Unknown,
}

impl PathType {
    /// Parse a Kubernetes spelling. Never fails.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "Prefix" => Self::Prefix,
            "Exact" => Self::Exact,
            "ImplementationSpecific" => Self::ImplementationSpecific,
            _ => Self::Unknown,
        }
    }

    /// The Kubernetes spelling of this path type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prefix => "Prefix",
            Self::Exact => "Exact",
            Self::ImplementationSpecific => "ImplementationSpecific",
            Self::Unknown => "Unknown",
        }
    }
}

impl<'de> Deserialize<'de> for PathType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map_or(Self::Unknown, Self::parse))
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend reference of a path.
///
/// Carries both the `networking.k8s.io/v1` shape (`service.name`, `service.port`) and the
/// legacy `extensions/v1beta1` shape (`serviceName`, `servicePort`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackend {
    #[serde(default)]
    pub service: Option<ServiceBackend>,

    /// Typed object reference (`resource` backends). Kept as raw data.
    #[serde(default)]
    pub resource: Option<serde_json::Value>,

    #[serde(default)]
    pub service_name: Option<String>,

    #[serde(default)]
    pub service_port: Option<PortRef>,
}

/// `backend.service` of a `networking.k8s.io/v1` ingress.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceBackend {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default)]
    pub port: Option<ServiceBackendPort>,
}

/// `backend.service.port`: a number or a named port.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceBackendPort {
    #[serde(default)]
    pub number: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,
}

impl ServiceBackendPort {
    /// The port reference, number first.
    #[must_use]
    pub fn to_port_ref(&self) -> Option<PortRef> {
        self.number
            .map(PortRef::Number)
            .or_else(|| self.name.clone().map(PortRef::Name))
    }
}

/// A port given either by number or by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortRef {
    Number(i64),
    Name(String),
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Accessors
// ═══════════════════════════════════════════════════════════════════════════════

impl Manifest {
    /// Parse every document of a multi-document YAML stream.
    ///
    /// Empty documents (a trailing `---`, a bare `null`) are skipped.
    ///
    /// # Errors
    ///
    /// Returns the YAML error of the first document that fails to parse.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut manifests = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            let value = serde_yaml::Value::deserialize(doc)?;
            if value.is_null() {
                continue;
            }
            manifests.push(serde_yaml::from_value(value)?);
        }
        Ok(manifests)
    }

    /// Parse a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns the JSON parse error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Annotations, empty when `metadata` or `annotations` is absent.
    #[must_use]
    pub fn annotations(&self) -> &BTreeMap<String, String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.annotations.as_ref())
            .unwrap_or(&NO_ANNOTATIONS)
    }

    /// A single annotation value.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations().get(key).map(String::as_str)
    }

    /// Rules in declaration order, empty when `spec` or `rules` is absent.
    #[must_use]
    pub fn rules(&self) -> &[IngressRule] {
        self.spec
            .as_ref()
            .and_then(|s| s.rules.as_deref())
            .unwrap_or_default()
    }

    /// `spec.ingressClassName`, if declared.
    #[must_use]
    pub fn ingress_class_name(&self) -> Option<&str> {
        self.spec.as_ref()?.ingress_class_name.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref()?.name.as_deref()
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.as_ref()?.namespace.as_deref()
    }

    /// `true` unless the document declares a kind other than `Ingress`.
    #[must_use]
    pub fn is_ingress(&self) -> bool {
        self.kind.as_deref().map_or(true, |kind| kind == "Ingress")
    }

    /// `namespace/name` for log and error messages.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.namespace(), self.name()) {
            (Some(ns), Some(name)) => format!("{ns}/{name}"),
            (None, Some(name)) => name.to_owned(),
            _ => "<unnamed>".to_owned(),
        }
    }

    /// Total number of path entries across rules with a non-empty host.
    #[must_use]
    pub fn routable_path_count(&self) -> usize {
        self.rules()
            .iter()
            .filter(|r| !r.host().is_empty())
            .map(|r| r.paths().len())
            .sum()
    }
}

impl IngressRule {
    /// The rule host, `""` when absent.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or_default()
    }

    /// Paths in declaration order, empty when `http` or `paths` is absent.
    #[must_use]
    pub fn paths(&self) -> &[PathEntry] {
        self.http
            .as_ref()
            .and_then(|h| h.paths.as_deref())
            .unwrap_or_default()
    }
}

impl PathEntry {
    /// The declared path, [`DEFAULT_PATH`] when absent. An explicit empty path stays empty.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_PATH)
    }

    /// The declared path type, [`PathType::Prefix`] when absent.
    #[must_use]
    pub fn path_type(&self) -> PathType {
        self.path_type.unwrap_or_default()
    }

    #[must_use]
    pub fn backend(&self) -> Option<&IngressBackend> {
        self.backend.as_ref()
    }
}

fn lenient_annotations<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some((key, value))
            })
            .collect()
    }))
}

fn lenient_path_type<'de, D>(deserializer: D) -> Result<Option<PathType>, D::Error>
where
    D: Deserializer<'de>,
{
    // Only reached when the key is present, so `null` is an explicit value.
    PathType::deserialize(deserializer).map(Some)
}
