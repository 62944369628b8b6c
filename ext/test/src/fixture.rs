//! Conformance fixture runner
//!
//! A fixture is one manifest, the context it is rewritten under and the expected outcome:
//!
//! ```yaml
//! name: tls_true
//! description: router.tls makes the upstream https
//! manifest:
//!   metadata:
//!     annotations:
//!       traefik.ingress.kubernetes.io/router.tls: "true"
//!   spec:
//!     rules: [...]
//! context:            # optional, RewriteContext
//!   config:
//!     ingress_types: {}
//! backends:           # optional, service -> upstream; empty uses ServiceBackendResolver
//!   web: web.internal:8080
//! expect_match: true  # optional, default true
//! expect:             # entries in order
//!   - { host: a.example.com, path: /, upstream: web:8080, scheme: https }
//! expect_error: false # optional, rewrite must fail instead
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use rewire::prelude::*;
use serde::Deserialize;

use crate::StaticBackendResolver;

/// A single rewrite scenario.
#[derive(Debug, Deserialize)]
pub struct RewriteFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub manifest: Manifest,
    #[serde(default)]
    pub context: RewriteContext,
    #[serde(default)]
    pub backends: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub expect_match: bool,
    #[serde(default)]
    pub expect: Vec<RoutingEntry>,
    #[serde(default)]
    pub expect_error: bool,
}

fn default_true() -> bool {
    true
}

/// What a rewriter actually did with a fixture.
#[derive(Debug)]
pub struct FixtureOutcome {
    pub matched: bool,
    pub result: Result<Vec<RoutingEntry>, BackendError>,
}

impl RewriteFixture {
    /// Parse a fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            let value = serde_yaml::Value::deserialize(doc)?;
            if value.is_null() {
                continue;
            }
            fixtures.push(serde_yaml::from_value(value)?);
        }
        Ok(fixtures)
    }

    /// The backend resolver this fixture asks for.
    #[must_use]
    pub fn backend_resolver(&self) -> Arc<dyn BackendResolver> {
        if self.backends.is_empty() {
            Arc::new(ServiceBackendResolver)
        } else {
            Arc::new(StaticBackendResolver::from(self.backends.clone()))
        }
    }

    /// Run the fixture against the rewriter `build` makes from [`Self::backend_resolver`].
    pub fn run<R, F>(&self, build: F) -> FixtureOutcome
    where
        R: IngressRewriter,
        F: FnOnce(Arc<dyn BackendResolver>) -> R,
    {
        let rewriter = build(self.backend_resolver());
        FixtureOutcome {
            matched: rewriter.matches(&self.manifest, &self.context),
            result: rewriter.rewrite(&self.manifest, &self.context),
        }
    }

    /// Run the fixture and panic on the first mismatch.
    pub fn run_and_assert<R, F>(&self, build: F)
    where
        R: IngressRewriter,
        F: FnOnce(Arc<dyn BackendResolver>) -> R,
    {
        let outcome = self.run(build);
        assert_eq!(
            outcome.matched, self.expect_match,
            "Fixture '{}': expected match = {}",
            self.name, self.expect_match
        );

        match (&outcome.result, self.expect_error) {
            (Err(_), true) => {}
            (Ok(entries), true) => {
                panic!("Fixture '{}': expected an error, got {entries:?}", self.name)
            }
            (Err(e), false) => panic!("Fixture '{}': unexpected error: {e}", self.name),
            (Ok(entries), false) => assert_eq!(
                entries, &self.expect,
                "Fixture '{}': entries differ",
                self.name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let f = RewriteFixture::from_yaml(
            r#"
name: minimal
manifest: {}
"#,
        )
        .unwrap();
        assert!(f.expect_match);
        assert!(!f.expect_error);
        assert!(f.expect.is_empty());
        assert_eq!(f.context, RewriteContext::default());
    }

    #[test]
    fn parses_multi_documents() {
        let fixtures = RewriteFixture::from_yaml_multi(
            r#"
name: one
manifest: {}
expect_match: false
---
name: two
manifest: {}
backends:
  web: web.internal:8080
expect:
  - host: a.example.com
    path: /
    upstream: web.internal:8080
    scheme: https
"#,
        )
        .unwrap();
        assert_eq!(fixtures.len(), 2);
        assert!(!fixtures[0].expect_match);
        assert_eq!(fixtures[1].expect[0].scheme, Scheme::Https);
        assert_eq!(fixtures[1].expect[0].strip_prefix, None);
        assert_eq!(fixtures[1].backends["web"], "web.internal:8080");
    }

    #[test]
    fn empty_documents_are_skipped() {
        let fixtures = RewriteFixture::from_yaml_multi(
            "---\nname: only\nmanifest: {}\nexpect_match: false\n---\n---\n",
        )
        .unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].name, "only");
        assert!(RewriteFixture::from_yaml_multi("").unwrap().is_empty());
    }
}
