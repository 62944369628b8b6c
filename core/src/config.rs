//! Rewrite context and configuration.
//!
//! These types deserialize from JSON/YAML. Every mapping defaults to empty, both when the
//! key is missing and when it is `null`.
//!
//! ```yaml
//! config:
//!   ingress_types:
//!     internal-traefik: traefik
//! services:
//!   aliases:
//!     api-svc: api
//!   named_ports:
//!     api-svc:
//!       http: 8080
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// User configuration seen by rewriters.
///
/// Only [`ingress_types`](Self::ingress_types) is interpreted by the engine. Any other key
/// is kept in [`extra`](Self::extra) for rewriters that want it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RewriteConfig {
    /// Custom ingress class name → canonical class name (e.g. `internal-traefik → traefik`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingress_types: BTreeMap<String, String>,

    /// Remaining configuration keys, untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RewriteConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a custom ingress class name to a canonical one (builder pattern).
    #[must_use]
    pub fn with_ingress_type(mut self, class: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.ingress_types.insert(class.into(), canonical.into());
        self
    }
}

/// What the host knows about the services backends point at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceIndex {
    /// Service name → address host to proxy to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: BTreeMap<String, String>,

    /// Service name → port name → port number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub named_ports: BTreeMap<String, BTreeMap<String, u16>>,
}

impl ServiceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_alias(mut self, service: impl Into<String>, host: impl Into<String>) -> Self {
        self.aliases.insert(service.into(), host.into());
        self
    }

    #[must_use]
    pub fn with_named_port(
        mut self,
        service: impl Into<String>,
        name: impl Into<String>,
        port: u16,
    ) -> Self {
        self.named_ports
            .entry(service.into())
            .or_default()
            .insert(name.into(), port);
        self
    }

    #[must_use]
    pub fn alias(&self, service: &str) -> Option<&str> {
        self.aliases.get(service).map(String::as_str)
    }

    #[must_use]
    pub fn named_port(&self, service: &str, name: &str) -> Option<u16> {
        self.named_ports.get(service)?.get(name).copied()
    }
}

/// Everything a rewriter may consult besides the manifest itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RewriteContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: RewriteConfig,

    #[serde(default, deserialize_with = "null_as_default")]
    pub services: ServiceIndex,
}

impl RewriteContext {
    #[must_use]
    pub fn new(config: RewriteConfig) -> Self {
        Self {
            config,
            services: ServiceIndex::default(),
        }
    }

    #[must_use]
    pub fn with_services(mut self, services: ServiceIndex) -> Self {
        self.services = services;
        self
    }

    /// The class alias mapping handed to class resolution.
    #[must_use]
    pub fn ingress_types(&self) -> &BTreeMap<String, String> {
        &self.config.ingress_types
    }

    /// Parse a context from YAML. An empty or `null` document is the default context.
    ///
    /// # Errors
    ///
    /// Returns the YAML parse error.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value)
    }

    /// Parse a context from JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON parse error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Deserialize `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
