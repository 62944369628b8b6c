//! rewire-test: test doubles and fixtures
//!
//! Provides manifest builders and deterministic [`ClassResolver`] / [`BackendResolver`]
//! implementations for testing rewriters without a real service index.
//!
//! # Example
//!
//! ```
//! use rewire_test::prelude::*;
//!
//! let manifest = ManifestBuilder::new()
//!     .name("web")
//!     .annotation("traefik.ingress.kubernetes.io/router.tls", "true")
//!     .rule("a.example.com", [service_path("/", "web", 80)])
//!     .build();
//!
//! let backends = StaticBackendResolver::new().with("web", "web.internal:8080");
//! let entry = &manifest.rules()[0].paths()[0];
//! let backend = backends
//!     .resolve(entry, &manifest, &RewriteContext::default())
//!     .unwrap();
//! assert_eq!(backend.upstream, "web.internal:8080");
//! ```

use std::collections::BTreeMap;

use rewire::manifest::{
    HttpRuleValue, IngressBackend, IngressRule, IngressSpec, ObjectMeta, ServiceBackend,
    ServiceBackendPort,
};
use rewire::prelude::*;
use rewire::DEFAULT_SERVICE_PORT;

#[cfg(feature = "fixtures")]
pub mod fixture;

// ═══════════════════════════════════════════════════════════════════════════════
// Manifest builders
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for [`Manifest`] values.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.manifest.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.metadata().name = Some(name.into());
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata().namespace = Some(namespace.into());
        self
    }

    /// Set `spec.ingressClassName`.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.spec().ingress_class_name = Some(class.into());
        self
    }

    #[must_use]
    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata()
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add a rule with an `http.paths` block.
    #[must_use]
    pub fn rule(mut self, host: impl Into<String>, paths: impl IntoIterator<Item = PathEntry>) -> Self {
        self.rules().push(IngressRule {
            host: Some(host.into()),
            http: Some(HttpRuleValue {
                paths: Some(paths.into_iter().collect()),
            }),
        });
        self
    }

    /// Add a rule without an `http` block.
    #[must_use]
    pub fn bare_rule(mut self, host: impl Into<String>) -> Self {
        self.rules().push(IngressRule {
            host: Some(host.into()),
            http: None,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Manifest {
        self.manifest
    }

    fn metadata(&mut self) -> &mut ObjectMeta {
        self.manifest.metadata.get_or_insert_with(ObjectMeta::default)
    }

    fn spec(&mut self) -> &mut IngressSpec {
        self.manifest.spec.get_or_insert_with(IngressSpec::default)
    }

    fn rules(&mut self) -> &mut Vec<IngressRule> {
        self.spec().rules.get_or_insert_with(Vec::new)
    }
}

/// A path routed to `service:port`, path type left unset (reads as `Prefix`).
#[must_use]
pub fn service_path(path: &str, service: &str, port: i64) -> PathEntry {
    PathEntry {
        path: Some(path.to_owned()),
        path_type: None,
        backend: Some(IngressBackend {
            service: Some(ServiceBackend {
                name: service.to_owned(),
                port: Some(ServiceBackendPort {
                    number: Some(port),
                    name: None,
                }),
            }),
            ..Default::default()
        }),
    }
}

/// A path with an explicit path type routed to `service:port`.
#[must_use]
pub fn typed_path(path: &str, path_type: PathType, service: &str, port: i64) -> PathEntry {
    PathEntry {
        path_type: Some(path_type),
        ..service_path(path, service, port)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resolvers
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns the same class for every manifest, ignoring `ingress_types`.
#[derive(Debug, Clone, Default)]
pub struct FixedClassResolver {
    class: Option<String>,
}

impl FixedClassResolver {
    /// Always resolve to `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
        }
    }

    /// Never resolve a class.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

impl ClassResolver for FixedClassResolver {
    fn resolve(&self, _manifest: &Manifest, _ingress_types: &BTreeMap<String, String>) -> Option<String> {
        self.class.clone()
    }
}

/// Resolves service names through a fixed table. Ports in the manifest are ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticBackendResolver {
    upstreams: BTreeMap<String, String>,
}

impl StaticBackendResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `service` to `upstream` (builder pattern).
    #[must_use]
    pub fn with(mut self, service: impl Into<String>, upstream: impl Into<String>) -> Self {
        self.upstreams.insert(service.into(), upstream.into());
        self
    }
}

impl From<BTreeMap<String, String>> for StaticBackendResolver {
    fn from(upstreams: BTreeMap<String, String>) -> Self {
        Self { upstreams }
    }
}

impl BackendResolver for StaticBackendResolver {
    fn resolve(
        &self,
        entry: &PathEntry,
        _manifest: &Manifest,
        _ctx: &RewriteContext,
    ) -> Result<Backend, BackendError> {
        let backend = entry.backend().ok_or_else(|| BackendError::MissingBackend {
            path: entry.path().to_owned(),
        })?;
        let service = backend
            .service
            .as_ref()
            .map(|s| s.name.as_str())
            .or(backend.service_name.as_deref())
            .unwrap_or_default();

        let upstream = self
            .upstreams
            .get(service)
            .ok_or_else(|| BackendError::unresolved(service, "not in the static table"))?;
        let port = upstream
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
            .unwrap_or(DEFAULT_SERVICE_PORT);

        Ok(Backend {
            service: service.to_owned(),
            port,
            upstream: upstream.clone(),
        })
    }
}

/// Fails every resolution with the given error.
#[derive(Debug, Clone)]
pub struct FailingBackendResolver {
    error: BackendError,
}

impl FailingBackendResolver {
    #[must_use]
    pub fn new(error: BackendError) -> Self {
        Self { error }
    }
}

impl BackendResolver for FailingBackendResolver {
    fn resolve(
        &self,
        _entry: &PathEntry,
        _manifest: &Manifest,
        _ctx: &RewriteContext,
    ) -> Result<Backend, BackendError> {
        Err(self.error.clone())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        service_path, typed_path, FailingBackendResolver, FixedClassResolver, ManifestBuilder,
        StaticBackendResolver,
    };
    pub use rewire::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_populates_nested_structures() {
        let m = ManifestBuilder::new()
            .kind("Ingress")
            .name("web")
            .namespace("shop")
            .class("traefik")
            .annotation("a/b", "c")
            .rule("a.example.com", [service_path("/api", "api", 8080)])
            .bare_rule("b.example.com")
            .build();

        assert!(m.is_ingress());
        assert_eq!(m.display_name(), "shop/web");
        assert_eq!(m.ingress_class_name(), Some("traefik"));
        assert_eq!(m.annotation("a/b"), Some("c"));
        assert_eq!(m.rules().len(), 2);
        assert_eq!(m.rules()[0].paths()[0].path(), "/api");
        assert!(m.rules()[1].paths().is_empty());
    }

    #[test]
    fn typed_path_sets_path_type() {
        let p = typed_path("/x", PathType::Exact, "svc", 80);
        assert_eq!(p.path_type(), PathType::Exact);
        assert_eq!(service_path("/x", "svc", 80).path_type, None);
    }

    #[test]
    fn static_resolver() {
        let m = Manifest::default();
        let ctx = RewriteContext::default();
        let r = StaticBackendResolver::new().with("api", "api.internal:9000");

        let backend = r.resolve(&service_path("/", "api", 80), &m, &ctx).unwrap();
        assert_eq!(backend.upstream, "api.internal:9000");
        assert_eq!(backend.port, 9000);

        let err = r.resolve(&service_path("/", "web", 80), &m, &ctx).unwrap_err();
        assert!(matches!(err, BackendError::Unresolved { ref service, .. } if service == "web"));
    }

    #[test]
    fn fixed_and_failing_resolvers() {
        let m = Manifest::default();
        assert_eq!(
            FixedClassResolver::new("traefik").resolve(&m, &BTreeMap::new()),
            Some("traefik".into())
        );
        assert_eq!(FixedClassResolver::none().resolve(&m, &BTreeMap::new()), None);

        let failing = FailingBackendResolver::new(BackendError::unresolved("x", "down"));
        assert!(failing
            .resolve(&PathEntry::default(), &m, &RewriteContext::default())
            .is_err());
    }
}
