//! In-memory record store backend for the Gantry workload manager.
//!
//! This crate provides an in-memory implementation of the `RecordStore` trait
//! from `gantry-storage`, using papaya lock-free HashMap for concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use gantry_db_memory::InMemoryRecordStore;
//! use gantry_storage::RecordStore;
//! use gantry_core::{WorkloadDescriptor, WorkloadRecord};
//!
//! let store = InMemoryRecordStore::new();
//!
//! let descriptor = WorkloadDescriptor::new("svc-a", "default", "nginx:1.21")
//!     .with_resources(1.0, 512.0);
//! let id = store.create(&WorkloadRecord::from_descriptor(&descriptor)).await?;
//! ```

mod storage;

// Re-export the RecordStore trait for convenience
pub use gantry_storage::{RecordStore, StorageError};

pub use storage::InMemoryRecordStore;

use gantry_storage::DynRecordStore;

/// Creates a new shareable in-memory record store.
pub fn create_record_store() -> DynRecordStore {
    std::sync::Arc::new(InMemoryRecordStore::new())
}
