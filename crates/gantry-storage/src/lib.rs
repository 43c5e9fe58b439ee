//! # gantry-storage
//!
//! Record store abstraction layer for the Gantry workload manager.
//!
//! This crate defines the traits and types that all durable record backends
//! must implement. It does not contain any implementations - those are
//! provided by separate crates (`gantry-db-memory` ships the reference
//! backend).
//!
//! ## Overview
//!
//! The main trait is [`RecordStore`], which defines the contract for:
//! - Inserting records (the store assigns the surrogate ID)
//! - Replacing and deleting records by ID
//! - Point and full listings
//!
//! ## Storage Backends
//!
//! To implement a backend, implement the [`RecordStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use gantry_storage::{RecordStore, StorageError};
//! use gantry_core::{RecordId, WorkloadRecord};
//!
//! struct MyStore {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl RecordStore for MyStore {
//!     async fn create(&self, record: &WorkloadRecord) -> Result<RecordId, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::RecordStore;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared record store trait object.
pub type DynRecordStore = std::sync::Arc<dyn RecordStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use gantry_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::RecordStore;
    pub use crate::{DynRecordStore, StorageResult};
}
