//! Ingress class resolution.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::Manifest;

/// Legacy annotation declaring the ingress class.
pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

/// Resolves the ingress class a manifest is meant for.
///
/// `ingress_types` maps custom class names to canonical ones. Implementations must be
/// pure: the same input gives the same answer.
pub trait ClassResolver: Send + Sync + Debug {
    /// The effective class name, or `None` when the manifest declares none.
    fn resolve(&self, manifest: &Manifest, ingress_types: &BTreeMap<String, String>)
        -> Option<String>;
}

/// Reads `spec.ingressClassName`, falling back to the `kubernetes.io/ingress.class`
/// annotation, then applies the `ingress_types` mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassResolver;

impl ClassResolver for DefaultClassResolver {
    fn resolve(
        &self,
        manifest: &Manifest,
        ingress_types: &BTreeMap<String, String>,
    ) -> Option<String> {
        let declared = manifest
            .ingress_class_name()
            .filter(|c| !c.is_empty())
            .or_else(|| {
                manifest
                    .annotation(INGRESS_CLASS_ANNOTATION)
                    .filter(|c| !c.is_empty())
            })?;

        let class = ingress_types
            .get(declared)
            .map_or(declared, String::as_str);
        Some(class.to_owned())
    }
}
