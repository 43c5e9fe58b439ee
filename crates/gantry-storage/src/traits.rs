//! Record store traits for the workload storage abstraction layer.
//!
//! This module defines the contract every durable record backend must
//! implement.

use async_trait::async_trait;

use crate::error::StorageError;
use gantry_core::{RecordId, WorkloadRecord};

/// The capability contract over durable workload records.
///
/// A record is addressed exclusively by its numeric surrogate ID; the store
/// assigns that ID on insert. Implementations must be thread-safe
/// (`Send + Sync`). The store knows nothing about the cluster: it persists
/// the last descriptor the reconciler handed it, nothing more.
///
/// # Example
///
/// ```ignore
/// use gantry_storage::{RecordStore, StorageError};
/// use gantry_core::{RecordId, WorkloadRecord};
///
/// async fn rename(store: &dyn RecordStore, id: RecordId) -> Result<(), StorageError> {
///     let mut record = store.find_by_id(id).await?;
///     record.name = format!("{}-renamed", record.name);
///     store.update(&record).await
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new workload record and returns the assigned surrogate ID.
    ///
    /// Any ID already present on `record` is ignored; assignment is the
    /// store's job, and assigned IDs are never zero.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues; insertion itself
    /// cannot conflict because the store owns ID assignment.
    async fn create(&self, record: &WorkloadRecord) -> Result<RecordId, StorageError>;

    /// Replaces the record stored under `record.id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no record exists under that ID.
    async fn update(&self, record: &WorkloadRecord) -> Result<(), StorageError>;

    /// Deletes the record with the given surrogate ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no record exists under that ID.
    async fn delete(&self, id: RecordId) -> Result<(), StorageError>;

    /// Fetches the record with the given surrogate ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no record exists under that ID.
    async fn find_by_id(&self, id: RecordId) -> Result<WorkloadRecord, StorageError>;

    /// Lists every stored record.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn find_all(&self) -> Result<Vec<WorkloadRecord>, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
