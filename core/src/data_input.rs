//! `DataInput`: extraction of matchable data from a manifest under detection.
//!
//! Detection runs against a [`Detection`] view: the manifest plus its ingress class, resolved
//! once up front through a [`ClassResolver`]. Inputs read that view and return
//! [`MatchingData`]; they never fail; absent data is [`MatchingData::None`].

use std::fmt::Debug;

use crate::{ClassResolver, Manifest, MatchingData, RewriteContext};

/// A manifest together with its resolved ingress class.
#[derive(Debug, Clone)]
pub struct Detection<'a> {
    manifest: &'a Manifest,
    class: Option<String>,
}

impl<'a> Detection<'a> {
    pub(crate) fn new(manifest: &'a Manifest, class: Option<String>) -> Self {
        Self { manifest, class }
    }

    /// Resolve the class with `classes` and the context's `ingress_types` mapping.
    #[must_use]
    pub fn resolve(
        manifest: &'a Manifest,
        ctx: &RewriteContext,
        classes: &dyn ClassResolver,
    ) -> Self {
        Self::new(manifest, classes.resolve(manifest, ctx.ingress_types()))
    }

    #[must_use]
    pub fn manifest(&self) -> &'a Manifest {
        self.manifest
    }

    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}

/// Extracts data from a [`Detection`].
///
/// All implementations must be `Send + Sync` so compiled detectors can be shared across
/// threads.
pub trait DataInput: Send + Sync + Debug {
    /// Extract data. Returns [`MatchingData::None`] when the data is absent.
    fn get(&self, detection: &Detection<'_>) -> MatchingData;
}

/// The resolved ingress class.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngressClassInput;

impl DataInput for IngressClassInput {
    fn get(&self, detection: &Detection<'_>) -> MatchingData {
        detection.class().map(str::to_owned).into()
    }
}

/// Every annotation key, as a list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationKeysInput;

impl DataInput for AnnotationKeysInput {
    fn get(&self, detection: &Detection<'_>) -> MatchingData {
        MatchingData::List(detection.manifest().annotations().keys().cloned().collect())
    }
}
