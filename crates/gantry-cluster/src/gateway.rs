//! Capability contract over the orchestration control plane.

use async_trait::async_trait;

use crate::ClusterManifest;

/// Errors surfaced by a cluster gateway.
///
/// Deliberately opaque: a failure may be a conflict, an authorization
/// problem, a malformed manifest, or a transient network fault, and callers
/// must not branch on which. The only cluster fact a caller may rely on is
/// whether `get` found an object.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The control plane rejected or failed the request.
    #[error("Control plane request failed: {message}")]
    Api {
        /// Description of the failure as reported by the control plane.
        message: String,
    },

    /// The control plane could not be reached at all.
    #[error("Control plane unreachable: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
}

impl GatewayError {
    /// Creates a new `Api` error.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }
}

/// CRUD over a single named workload manifest in a namespace.
///
/// Every call suspends on network I/O to the control plane; there is no
/// caching and no retry at this layer. Implementations must be thread-safe
/// (`Send + Sync`).
#[async_trait]
pub trait ClusterGateway: Send + Sync {
    /// Fetches the live manifest for (namespace, name).
    ///
    /// Returns `None` if no such workload exists.
    ///
    /// # Errors
    ///
    /// Returns an error for any control-plane failure other than "not
    /// found".
    async fn get(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ClusterManifest>, GatewayError>;

    /// Submits a new workload manifest.
    ///
    /// # Errors
    ///
    /// Returns an opaque error if the control plane rejects the create,
    /// including when the identity already exists.
    async fn create(&self, manifest: &ClusterManifest) -> Result<(), GatewayError>;

    /// Replaces the live manifest for the identity carried in `manifest`.
    ///
    /// # Errors
    ///
    /// Returns an opaque error if the control plane rejects the replace,
    /// including on concurrent-modification conflicts.
    async fn update(&self, manifest: &ClusterManifest) -> Result<(), GatewayError>;

    /// Deletes the workload at (namespace, name).
    ///
    /// # Errors
    ///
    /// Returns an opaque error if the delete fails.
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), GatewayError>;
}
