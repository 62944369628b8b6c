//! rewire-traefik: Traefik ingress annotations
//!
//! Rewrites standard Kubernetes `Ingress` resources handled by Traefik into
//! [`RoutingEntry`](rewire::RoutingEntry) values.
//!
//! # Supported annotations
//!
//! | Annotation | Effect |
//! |------------|--------|
//! | `traefik.ingress.kubernetes.io/router.tls: "true"` | `https` upstream scheme |
//! | `traefik.ingress.kubernetes.io/router.middlewares` | hints at prefix stripping on `Prefix` paths |
//! | `traefik.ingress.kubernetes.io/router.entrypoints` | informational, ignored |
//!
//! `router.tls` is about the proxy → backend connection. TLS termination for clients is the
//! target proxy's own business.
//!
//! Traefik CRDs (`IngressRoute`, `Middleware`) are out of scope: those need a full
//! converter, not an annotation rewriter. Because middlewares are not resolved,
//! `strip_prefix` is a best-effort guess.
//!
//! # Example
//!
//! ```
//! use rewire::prelude::*;
//! use rewire_traefik::TraefikRewriter;
//!
//! let manifests = Manifest::from_yaml_multi(r#"
//! metadata:
//!   annotations:
//!     traefik.ingress.kubernetes.io/router.tls: "true"
//! spec:
//!   rules:
//!     - host: a.example.com
//!       http:
//!         paths:
//!           - path: /
//!             backend:
//!               service:
//!                 name: web
//!                 port:
//!                   number: 8080
//! "#).unwrap();
//! let manifest = &manifests[0];
//!
//! let rewriter = TraefikRewriter::new();
//! let ctx = RewriteContext::default();
//! assert!(rewriter.matches(manifest, &ctx));
//!
//! let entries = rewriter.rewrite(manifest, &ctx).unwrap();
//! assert_eq!(entries[0].upstream_url(), "https://web:8080");
//! assert_eq!(entries[0].strip_prefix, None);
//! ```

mod rewriter;

pub use rewriter::TraefikRewriter;

/// Registry name of the Traefik rewriter, and the ingress class it claims.
pub const NAME: &str = "traefik";

/// Prefix shared by every Traefik ingress annotation.
pub const ANNOTATION_PREFIX: &str = "traefik.ingress.kubernetes.io/";

/// `"true"` (any case) makes the upstream connection HTTPS.
pub const ROUTER_TLS: &str = "traefik.ingress.kubernetes.io/router.tls";

/// Comma-separated `namespace-name@kubernetescrd` middleware references.
pub const ROUTER_MIDDLEWARES: &str = "traefik.ingress.kubernetes.io/router.middlewares";

/// Traefik entrypoints the router listens on. No equivalent on the target side.
pub const ROUTER_ENTRYPOINTS: &str = "traefik.ingress.kubernetes.io/router.entrypoints";

/// Register the Traefik rewriter with default resolvers.
#[must_use]
pub fn register(builder: rewire::RewriterRegistryBuilder) -> rewire::RewriterRegistryBuilder {
    builder.rewriter(TraefikRewriter::new())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{TraefikRewriter, ANNOTATION_PREFIX, NAME, ROUTER_MIDDLEWARES, ROUTER_TLS};
    pub use rewire::prelude::*;
}
