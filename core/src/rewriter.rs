//! The rewriter plugin contract.

use std::fmt::Debug;

use crate::{BackendError, Manifest, RewriteContext, RoutingEntry};

/// A vendor-specific ingress rewriter.
///
/// The host asks every registered rewriter, in registration order, whether it
/// [`matches`](Self::matches) a manifest, and calls [`rewrite`](Self::rewrite) on the first
/// one that does. Both calls are pure functions of their inputs.
///
/// # Example
///
/// ```
/// use rewire::prelude::*;
///
/// #[derive(Debug)]
/// struct Passthrough;
///
/// impl IngressRewriter for Passthrough {
///     fn name(&self) -> &'static str {
///         "passthrough"
///     }
///
///     fn matches(&self, _manifest: &Manifest, _ctx: &RewriteContext) -> bool {
///         true
///     }
///
///     fn rewrite(
///         &self,
///         _manifest: &Manifest,
///         _ctx: &RewriteContext,
///     ) -> Result<Vec<RoutingEntry>, BackendError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let registry = RewriterRegistryBuilder::new().rewriter(Passthrough).build();
/// assert_eq!(registry.names().collect::<Vec<_>>(), ["passthrough"]);
/// ```
pub trait IngressRewriter: Send + Sync + Debug {
    /// Stable identifier used for registry lookup and ordering.
    fn name(&self) -> &'static str;

    /// Whether this rewriter applies to `manifest`. Never fails.
    fn matches(&self, manifest: &Manifest, ctx: &RewriteContext) -> bool;

    /// Project the manifest's rules into routing entries, in rule-then-path order.
    ///
    /// # Errors
    ///
    /// Returns the backend resolver's error unchanged.
    fn rewrite(
        &self,
        manifest: &Manifest,
        ctx: &RewriteContext,
    ) -> Result<Vec<RoutingEntry>, BackendError>;
}
