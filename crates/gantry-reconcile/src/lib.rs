//! Workload reconciliation engine for Gantry
//!
//! The reconciler keeps two views of every workload in step: the live
//! object in the orchestration cluster and the durable record in the
//! store. Each lifecycle call runs a fixed check-act sequence, cluster
//! first and record second; failures between the two steps are surfaced to
//! the caller rather than repaired silently.
//!
//! ## Example
//!
//! ```ignore
//! use gantry_reconcile::WorkloadReconciler;
//!
//! let reconciler = WorkloadReconciler::new(gateway, store);
//! let id = reconciler.create(&descriptor).await?;
//! let record = reconciler.find(id).await?;
//! ```

pub mod error;
pub mod reconciler;

// Re-export main types for convenience
pub use error::{ErrorCategory, ReconcileError};
pub use reconciler::WorkloadReconciler;

/// Result type for reconciler operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ReconcileResult;
    pub use crate::error::{ErrorCategory, ReconcileError};
    pub use crate::reconciler::WorkloadReconciler;
}
