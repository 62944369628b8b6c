//! Normalized routing entries produced by rewriters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scheme of the proxy → backend connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `host + path → upstream` route for the target proxy.
///
/// `strip_prefix` is a hint, not a guarantee: rewriters set it when annotations suggest the
/// source controller strips the matched prefix before forwarding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub host: String,
    pub path: String,
    pub upstream: String,
    pub scheme: Scheme,
    #[serde(default)]
    pub strip_prefix: Option<String>,
}

impl RoutingEntry {
    /// `scheme://upstream`.
    #[must_use]
    pub fn upstream_url(&self) -> String {
        format!("{}://{}", self.scheme, self.upstream)
    }
}

impl fmt::Display for RoutingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} -> {}", self.host, self.path, self.upstream_url())?;
        if let Some(prefix) = &self.strip_prefix {
            write!(f, " (strip {prefix})")?;
        }
        Ok(())
    }
}
