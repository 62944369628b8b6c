//! Rewriter registry: ordered, immutable after build, first match wins.
//!
//! ```ignore
//! let registry = RewriterRegistryBuilder::new()
//!     .rewriter(TraefikRewriter::new())
//!     .build();
//!
//! let entries = registry.rewrite_all(&manifests, &ctx)?;
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{IngressRewriter, Manifest, RewriteContext, RewriteError, RoutingEntry};

/// Builder for a [`RewriterRegistry`].
///
/// Rewriters are consulted in registration order. Registering a name twice replaces the
/// earlier rewriter in its original position.
#[derive(Debug, Default)]
pub struct RewriterRegistryBuilder {
    rewriters: Vec<Arc<dyn IngressRewriter>>,
}

impl RewriterRegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rewriter.
    #[must_use]
    pub fn rewriter<R: IngressRewriter + 'static>(self, rewriter: R) -> Self {
        self.shared(Arc::new(rewriter))
    }

    /// Register an already shared rewriter.
    #[must_use]
    pub fn shared(mut self, rewriter: Arc<dyn IngressRewriter>) -> Self {
        let name = rewriter.name();
        if let Some(slot) = self.rewriters.iter_mut().find(|r| r.name() == name) {
            warn!(rewriter = name, "rewriter registered twice, replacing");
            *slot = rewriter;
        } else {
            self.rewriters.push(rewriter);
        }
        self
    }

    /// Freeze the registry. No further registration is possible.
    #[must_use]
    pub fn build(self) -> RewriterRegistry {
        RewriterRegistry {
            rewriters: self.rewriters,
        }
    }
}

/// Immutable, ordered set of rewriters.
#[derive(Debug, Clone, Default)]
pub struct RewriterRegistry {
    rewriters: Vec<Arc<dyn IngressRewriter>>,
}

impl RewriterRegistry {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewriters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewriters.is_empty()
    }

    /// Rewriter names in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rewriters.iter().map(|r| r.name())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn IngressRewriter> {
        self.rewriters
            .iter()
            .find(|r| r.name() == name)
            .map(|r| &**r)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The first rewriter that matches `manifest`.
    #[must_use]
    pub fn find(&self, manifest: &Manifest, ctx: &RewriteContext) -> Option<&dyn IngressRewriter> {
        self.rewriters
            .iter()
            .find(|r| r.matches(manifest, ctx))
            .map(|r| &**r)
    }

    /// Rewrite one manifest with the first matching rewriter.
    ///
    /// Returns `Ok(None)` when no rewriter matches.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Backend`] when the matched rewriter fails to resolve a backend.
    pub fn rewrite(
        &self,
        manifest: &Manifest,
        ctx: &RewriteContext,
    ) -> Result<Option<Vec<RoutingEntry>>, RewriteError> {
        let Some(rewriter) = self.find(manifest, ctx) else {
            debug!(manifest = %manifest.display_name(), "no rewriter matches");
            return Ok(None);
        };

        debug!(
            manifest = %manifest.display_name(),
            rewriter = rewriter.name(),
            "rewriting manifest"
        );
        rewriter
            .rewrite(manifest, ctx)
            .map(Some)
            .map_err(|source| RewriteError::Backend {
                rewriter: rewriter.name().to_owned(),
                manifest: manifest.display_name(),
                source,
            })
    }

    /// Rewrite every ingress manifest and concatenate the entries in input order.
    ///
    /// Documents whose `kind` is set to something other than `Ingress` are skipped, as are
    /// manifests no rewriter matches.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RewriteError`].
    pub fn rewrite_all<'a, I>(
        &self,
        manifests: I,
        ctx: &RewriteContext,
    ) -> Result<Vec<RoutingEntry>, RewriteError>
    where
        I: IntoIterator<Item = &'a Manifest>,
    {
        let mut entries = Vec::new();
        for manifest in manifests {
            if !manifest.is_ingress() {
                debug!(
                    manifest = %manifest.display_name(),
                    kind = manifest.kind.as_deref().unwrap_or_default(),
                    "skipping non-ingress document"
                );
                continue;
            }
            if let Some(found) = self.rewrite(manifest, ctx)? {
                entries.extend(found);
            }
        }
        Ok(entries)
    }
}
