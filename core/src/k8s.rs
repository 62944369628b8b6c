//! Conversion from `k8s-openapi` ingress objects (feature = `"k8s"`).
//!
//! Lets hosts that already hold typed `networking.k8s.io/v1` objects (from a client or
//! their own loader) feed them to rewriters without a serde round trip.

use k8s_openapi::api::networking::v1 as net;

use crate::manifest::{
    HttpRuleValue, IngressBackend, IngressRule, IngressSpec, ObjectMeta, PathEntry, PathType,
    ServiceBackend, ServiceBackendPort,
};
use crate::Manifest;

impl From<net::Ingress> for Manifest {
    fn from(ingress: net::Ingress) -> Self {
        Self {
            api_version: Some("networking.k8s.io/v1".to_owned()),
            kind: Some("Ingress".to_owned()),
            metadata: Some(ObjectMeta {
                name: ingress.metadata.name,
                namespace: ingress.metadata.namespace,
                annotations: ingress.metadata.annotations,
            }),
            spec: ingress.spec.map(|spec| IngressSpec {
                ingress_class_name: spec.ingress_class_name,
                rules: spec
                    .rules
                    .map(|rules| rules.into_iter().map(IngressRule::from).collect()),
            }),
        }
    }
}

impl From<net::IngressRule> for IngressRule {
    fn from(rule: net::IngressRule) -> Self {
        Self {
            host: rule.host,
            http: rule.http.map(|http| HttpRuleValue {
                paths: Some(http.paths.into_iter().map(PathEntry::from).collect()),
            }),
        }
    }
}

impl From<net::HTTPIngressPath> for PathEntry {
    fn from(path: net::HTTPIngressPath) -> Self {
        Self {
            path: path.path,
            path_type: Some(PathType::parse(&path.path_type)),
            backend: Some(IngressBackend::from(path.backend)),
        }
    }
}

impl From<net::IngressBackend> for IngressBackend {
    fn from(backend: net::IngressBackend) -> Self {
        Self {
            service: backend.service.map(|svc| ServiceBackend {
                name: svc.name,
                port: svc.port.map(|port| ServiceBackendPort {
                    number: port.number.map(i64::from),
                    name: port.name,
                }),
            }),
            resource: backend
                .resource
                .and_then(|r| serde_json::to_value(r).ok()),
            service_name: None,
            service_port: None,
        }
    }
}
