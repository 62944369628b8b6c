//! Error types.
//!
//! Missing optional manifest structure is never an error. Errors come from backend
//! resolution and from dispatch, which adds rewriter and manifest context.

use thiserror::Error;

/// A backend reference could not be turned into an upstream address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The path entry has no `backend` block.
    #[error("path \"{path}\" has no backend")]
    MissingBackend {
        /// Path of the offending entry.
        path: String,
    },

    /// The backend is a typed `resource` reference, which cannot be proxied.
    #[error("path \"{path}\" uses a resource backend, only service backends can be proxied")]
    ResourceBackend {
        /// Path of the offending entry.
        path: String,
    },

    /// The backend names no service.
    #[error("path \"{path}\" backend has an empty service name")]
    MissingServiceName {
        /// Path of the offending entry.
        path: String,
    },

    /// A named port is not known for the service.
    #[error("service \"{service}\" has no port named \"{port}\"")]
    UnknownNamedPort {
        /// Service name.
        service: String,
        /// Port name.
        port: String,
    },

    /// A numeric port is outside `1..=65535`.
    #[error("service \"{service}\" port {port} is out of range")]
    InvalidPort {
        /// Service name.
        service: String,
        /// The rejected port number.
        port: i64,
    },

    /// Resolver-specific failure.
    #[error("cannot resolve service \"{service}\": {reason}")]
    Unresolved {
        /// Service name.
        service: String,
        /// Why the resolver gave up.
        reason: String,
    },
}

impl BackendError {
    /// Create an `Unresolved` error.
    #[inline]
    pub fn unresolved(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unresolved {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

/// Dispatching a manifest through the registry failed.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The matched rewriter could not resolve a backend.
    #[error("rewriter \"{rewriter}\" failed on {manifest}")]
    Backend {
        /// Name of the rewriter that matched.
        rewriter: String,
        /// Display name of the manifest.
        manifest: String,
        /// Resolver error, unchanged.
        #[source]
        source: BackendError,
    },
}
