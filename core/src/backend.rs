//! Backend resolution: from a path's backend reference to an upstream address.

use std::fmt::Debug;

use crate::manifest::{IngressBackend, PortRef};
use crate::{BackendError, Manifest, PathEntry, RewriteContext};

/// Port used when a service backend names no port.
pub const DEFAULT_SERVICE_PORT: u16 = 80;

/// A resolved backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// Service name as written in the manifest.
    pub service: String,
    /// Resolved port number.
    pub port: u16,
    /// `host:port` address the proxy forwards to.
    pub upstream: String,
}

/// Resolves the backend of a path entry.
///
/// Rewriters call this once per path and propagate its error unchanged.
pub trait BackendResolver: Send + Sync + Debug {
    /// Resolve the backend of `entry`, a path of `manifest`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when the reference cannot be turned into an address.
    fn resolve(
        &self,
        entry: &PathEntry,
        manifest: &Manifest,
        ctx: &RewriteContext,
    ) -> Result<Backend, BackendError>;
}

/// Resolves service backends against the context's [`ServiceIndex`](crate::ServiceIndex).
///
/// - `backend.service.{name, port}` and legacy `backend.{serviceName, servicePort}`
/// - named ports go through `services.named_ports`, a missing port is
///   [`DEFAULT_SERVICE_PORT`]
/// - service names go through `services.aliases`
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceBackendResolver;

impl BackendResolver for ServiceBackendResolver {
    fn resolve(
        &self,
        entry: &PathEntry,
        _manifest: &Manifest,
        ctx: &RewriteContext,
    ) -> Result<Backend, BackendError> {
        let backend = entry.backend().ok_or_else(|| BackendError::MissingBackend {
            path: entry.path().to_owned(),
        })?;
        let (service, port) = service_ref(backend, entry.path())?;

        let port = match port {
            None => DEFAULT_SERVICE_PORT,
            Some(PortRef::Number(n)) => checked_port(service, n)?,
            // Legacy manifests sometimes quote numeric ports.
            Some(PortRef::Name(name)) => match name.parse::<i64>() {
                Ok(n) => checked_port(service, n)?,
                Err(_) => ctx.services.named_port(service, &name).ok_or_else(|| {
                    BackendError::UnknownNamedPort {
                        service: service.to_owned(),
                        port: name.clone(),
                    }
                })?,
            },
        };

        let host = ctx.services.alias(service).unwrap_or(service);
        Ok(Backend {
            service: service.to_owned(),
            port,
            upstream: format!("{host}:{port}"),
        })
    }
}

fn service_ref<'a>(
    backend: &'a IngressBackend,
    path: &str,
) -> Result<(&'a str, Option<PortRef>), BackendError> {
    let (service, port) = if let Some(svc) = &backend.service {
        (
            svc.name.as_str(),
            svc.port.as_ref().and_then(|p| p.to_port_ref()),
        )
    } else if let Some(name) = &backend.service_name {
        (name.as_str(), backend.service_port.clone())
    } else if backend.resource.is_some() {
        return Err(BackendError::ResourceBackend {
            path: path.to_owned(),
        });
    } else {
        return Err(BackendError::MissingBackend {
            path: path.to_owned(),
        });
    };

    if service.is_empty() {
        return Err(BackendError::MissingServiceName {
            path: path.to_owned(),
        });
    }
    Ok((service, port))
}

fn checked_port(service: &str, port: i64) -> Result<u16, BackendError> {
    u16::try_from(port)
        .ok()
        .filter(|p| *p != 0)
        .ok_or_else(|| BackendError::InvalidPort {
            service: service.to_owned(),
            port,
        })
}
