//! rewire - ingress annotation rewriting engine
//!
//! Translates one ingress controller's routing manifests (host/path rules plus
//! vendor-specific annotations) into target-agnostic [`RoutingEntry`] values for a
//! different edge proxy.
//!
//! # Architecture
//!
//! ```text
//! Manifest ──▶ RewriterRegistry ──find()──▶ IngressRewriter::matches()
//!                    │                              │ first match wins
//!                    └──────rewrite()──────▶ IngressRewriter::rewrite()
//!                                                   │  ClassResolver / BackendResolver
//!                                                   ▼
//!                                           Vec<RoutingEntry>
//! ```
//!
//! - [`Manifest`]: ingress document; every nested structure optional, accessors apply
//!   defaults so absent data reads as empty
//! - [`IngressRewriter`]: the plugin contract every rewriter implements
//! - [`RewriterRegistry`]: ordered rewriters, immutable after build
//! - [`ClassResolver`] / [`BackendResolver`]: the two lookups rewriters delegate to
//! - [`Predicate`] over [`DataInput`] + [`InputMatcher`]: detection rules
//!
//! # Key invariants
//!
//! 1. **Absent is empty**: missing annotations, rules, `http` blocks or paths never error.
//! 2. **Pure**: detection and rewriting read their inputs and nothing else.
//! 3. **Backend errors propagate**: rewriters return the resolver's [`BackendError`]
//!    unchanged; only the registry adds context.
//!
//! # Extensions
//!
//! - [`rewire-traefik`](https://docs.rs/rewire-traefik): Traefik annotations
//! - [`rewire-test`](https://docs.rs/rewire-test): test doubles and fixtures (internal)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod backend;
mod class;
mod config;
mod data_input;
mod entry;
mod error;
mod input_matcher;
pub mod manifest;
mod matching_data;
mod predicate;
mod registry;
mod rewriter;

#[cfg(feature = "k8s")]
mod k8s;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Data model
pub use config::{RewriteConfig, RewriteContext, ServiceIndex};
pub use entry::{RoutingEntry, Scheme};
pub use manifest::{Manifest, PathEntry, PathType};

// Plugin contract and dispatch
pub use registry::{RewriterRegistry, RewriterRegistryBuilder};
pub use rewriter::IngressRewriter;

// External lookups
pub use backend::{Backend, BackendResolver, ServiceBackendResolver, DEFAULT_SERVICE_PORT};
pub use class::{ClassResolver, DefaultClassResolver, INGRESS_CLASS_ANNOTATION};

// Detection
pub use data_input::{AnnotationKeysInput, DataInput, Detection, IngressClassInput};
pub use input_matcher::{ExactMatcher, InputMatcher, PrefixMatcher};
pub use matching_data::MatchingData;
pub use predicate::{Predicate, SinglePredicate};

// Errors
pub use error::{BackendError, RewriteError};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use rewire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Detection
        AnnotationKeysInput,
        // Lookups
        Backend,
        // Errors
        BackendError,
        BackendResolver,
        ClassResolver,
        DataInput,
        DefaultClassResolver,
        Detection,
        ExactMatcher,
        IngressClassInput,
        // Plugin contract
        IngressRewriter,
        InputMatcher,
        // Data model
        Manifest,
        MatchingData,
        PathEntry,
        PathType,
        Predicate,
        PrefixMatcher,
        RewriteConfig,
        RewriteContext,
        RewriteError,
        RewriterRegistry,
        RewriterRegistryBuilder,
        RoutingEntry,
        Scheme,
        ServiceBackendResolver,
        ServiceIndex,
    };
}
