//! Error types for the reconciliation engine.

use gantry_cluster::GatewayError;
use gantry_storage::StorageError;

/// Errors surfaced by the workload reconciler.
///
/// Every lifecycle call fails independently; no variant is fatal to the
/// process and none triggers a retry or rollback inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The create target is already live in the cluster.
    #[error("Workload {namespace}/{name} already exists")]
    AlreadyExists { name: String, namespace: String },

    /// The update or delete target is absent from the cluster or the
    /// record store.
    #[error("Workload not found: {target}")]
    NotFound { target: String },

    /// The control plane failed a mutation or an existence check.
    #[error("Cluster operation failed: {0}")]
    ClusterOperationFailed(#[from] GatewayError),

    /// The record store failed a write after the cluster side already
    /// succeeded, or failed to serve a read.
    #[error("Record persistence failed: {0}")]
    RecordPersistFailed(#[source] StorageError),
}

impl ReconcileError {
    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::AlreadyExists {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Creates a new `NotFound` error describing the missing target.
    #[must_use]
    pub fn not_found(target: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
        }
    }

    /// Returns true if this is an `AlreadyExists` error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns true if this is a `NotFound` error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the category of this error for logging and metrics.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ClusterOperationFailed(_) => ErrorCategory::Cluster,
            Self::RecordPersistFailed(_) => ErrorCategory::Storage,
        }
    }
}

/// Categories of reconcile errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The target already exists
    Conflict,
    /// The target was not found
    NotFound,
    /// The cluster control plane failed
    Cluster,
    /// The record store failed
    Storage,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not_found"),
            Self::Cluster => write!(f, "cluster"),
            Self::Storage => write!(f, "storage"),
        }
    }
}
