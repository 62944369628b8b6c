use std::sync::Arc;

use rewire::prelude::*;
use tracing::{debug, trace};

use crate::{ANNOTATION_PREFIX, NAME, ROUTER_ENTRYPOINTS, ROUTER_MIDDLEWARES, ROUTER_TLS};

/// Rewrites Traefik-handled ingresses.
///
/// A manifest matches when its resolved class is `traefik`, or when any annotation key
/// starts with [`ANNOTATION_PREFIX`]. Class resolution and backend resolution are
/// delegated; resolver errors propagate unchanged.
#[derive(Debug)]
pub struct TraefikRewriter {
    detector: Predicate,
    classes: Arc<dyn ClassResolver>,
    backends: Arc<dyn BackendResolver>,
}

impl TraefikRewriter {
    /// Rewriter using [`DefaultClassResolver`] and [`ServiceBackendResolver`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolvers(Arc::new(DefaultClassResolver), Arc::new(ServiceBackendResolver))
    }

    /// Rewriter with host-supplied resolvers.
    #[must_use]
    pub fn with_resolvers(
        classes: Arc<dyn ClassResolver>,
        backends: Arc<dyn BackendResolver>,
    ) -> Self {
        Self {
            detector: detector(),
            classes,
            backends,
        }
    }
}

impl Default for TraefikRewriter {
    fn default() -> Self {
        Self::new()
    }
}

fn detector() -> Predicate {
    Predicate::Or(vec![
        Predicate::single(IngressClassInput, ExactMatcher::new(NAME)),
        Predicate::single(AnnotationKeysInput, PrefixMatcher::new(ANNOTATION_PREFIX)),
    ])
}

impl IngressRewriter for TraefikRewriter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn matches(&self, manifest: &Manifest, ctx: &RewriteContext) -> bool {
        let detection = Detection::resolve(manifest, ctx, &*self.classes);
        self.detector.evaluate(&detection)
    }

    fn rewrite(
        &self,
        manifest: &Manifest,
        ctx: &RewriteContext,
    ) -> Result<Vec<RoutingEntry>, BackendError> {
        let scheme = if manifest
            .annotation(ROUTER_TLS)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            Scheme::Https
        } else {
            Scheme::Http
        };
        // Only a hint: the middleware itself is never resolved.
        let has_middlewares = manifest
            .annotation(ROUTER_MIDDLEWARES)
            .is_some_and(|v| !v.is_empty());

        if let Some(entrypoints) = manifest.annotation(ROUTER_ENTRYPOINTS) {
            debug!(
                manifest = %manifest.display_name(),
                entrypoints,
                "ignoring router.entrypoints"
            );
        }

        let mut entries = Vec::with_capacity(manifest.routable_path_count());
        for rule in manifest.rules() {
            let host = rule.host();
            if host.is_empty() {
                trace!(manifest = %manifest.display_name(), "skipping rule without host");
                continue;
            }

            for entry in rule.paths() {
                let backend = self.backends.resolve(entry, manifest, ctx)?;
                let routed = RoutingEntry {
                    host: host.to_owned(),
                    path: entry.path().to_owned(),
                    upstream: backend.upstream,
                    scheme,
                    strip_prefix: strip_prefix(entry, has_middlewares),
                };
                trace!(entry = %routed, "emitting route");
                entries.push(routed);
            }
        }

        debug!(
            manifest = %manifest.display_name(),
            entries = entries.len(),
            %scheme,
            "rewrote traefik ingress"
        );
        Ok(entries)
    }
}

/// `Prefix` paths other than `/` lose their trailing slashes when middlewares are attached.
fn strip_prefix(entry: &PathEntry, has_middlewares: bool) -> Option<String> {
    let path = entry.path();
    let eligible = has_middlewares
        && entry.path_type() == PathType::Prefix
        && !path.is_empty()
        && path != "/";
    eligible.then(|| path.trim_end_matches('/').to_owned())
}
