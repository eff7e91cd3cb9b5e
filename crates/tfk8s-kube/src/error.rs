//! Error types for tfk8s-kube

use thiserror::Error;
use tfk8s_core::Diagnostics;

/// Result type for tfk8s-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while handling CRDs and Kubernetes objects
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Object not found in the cluster
    #[error("{kind} '{name}' not found{}", namespace.as_deref().map(|ns| format!(" in namespace '{}'", ns)).unwrap_or_default())]
    ObjectNotFound {
        kind: String,
        name: String,
        namespace: Option<String>,
    },

    /// Resource type not known to the catalog
    #[error("unknown resource type '{0}'\nHint: Run `tfk8s types <crds>` to list available types")]
    UnknownType(String),

    /// Invalid CRD document
    #[error("invalid CRD: {0}")]
    InvalidCrd(String),

    /// Configuration failed validation
    #[error("configuration has {} error(s):\n{diagnostics}", diagnostics.error_count())]
    InvalidConfig { diagnostics: Diagnostics },

    /// Namespace missing for a namespaced type, or given for a cluster-scoped one
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Core conversion error
    #[error(transparent)]
    Core(#[from] tfk8s_core::CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for KubeError {
    fn from(e: serde_yaml::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl KubeError {
    /// Check if this is a not-found error (from the catalog or the API)
    pub fn is_not_found(&self) -> bool {
        match self {
            KubeError::ObjectNotFound { .. } => true,
            KubeError::Api(kube::Error::Api(resp)) => resp.code == 404,
            _ => false,
        }
    }
}
