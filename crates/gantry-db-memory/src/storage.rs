use async_trait::async_trait;
use gantry_core::{RecordId, WorkloadRecord};
use gantry_storage::{RecordStore, StorageError};
use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use time::OffsetDateTime;

/// In-memory record store using papaya lock-free HashMap.
///
/// This store implementation provides:
/// - Lock-free concurrent access via papaya::HashMap
/// - Monotonic surrogate ID assignment starting at 1
/// - Timestamp stamping on insert and replace
///
/// Records live only as long as the process; this is the reference backend
/// for tests and embedded use.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    /// Main storage using papaya for lock-free concurrent access
    records: Arc<PapayaHashMap<RecordId, WorkloadRecord>>,
    /// Atomic counter for assigning surrogate IDs; the first ID handed out is 1
    id_counter: AtomicI64,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory record store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(PapayaHashMap::new()),
            id_counter: AtomicI64::new(1),
        }
    }

    /// Hands out the next surrogate ID.
    fn next_id(&self) -> RecordId {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of records currently stored.
    pub fn count(&self) -> usize {
        self.records.pin().iter().count()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, record: &WorkloadRecord) -> Result<RecordId, StorageError> {
        let id = self.next_id();
        let now = OffsetDateTime::now_utc();

        let mut stored = record.clone();
        stored.id = id;
        stored.created_at = now;
        stored.updated_at = now;

        let guard = self.records.pin();
        guard.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, record: &WorkloadRecord) -> Result<(), StorageError> {
        let guard = self.records.pin();

        // Check if the record exists; keep its original creation timestamp
        let existing = guard
            .get(&record.id)
            .ok_or_else(|| StorageError::not_found(record.id))?;

        let mut stored = record.clone();
        stored.created_at = existing.created_at;
        stored.updated_at = OffsetDateTime::now_utc();

        guard.insert(record.id, stored);
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), StorageError> {
        let guard = self.records.pin();
        match guard.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(id)),
        }
    }

    async fn find_by_id(&self, id: RecordId) -> Result<WorkloadRecord, StorageError> {
        let guard = self.records.pin();
        guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(id))
    }

    async fn find_all(&self) -> Result<Vec<WorkloadRecord>, StorageError> {
        let guard = self.records.pin();
        let mut all: Vec<WorkloadRecord> = guard.iter().map(|(_, record)| record.clone()).collect();
        // Deterministic listing order
        all.sort_by_key(|record| record.id);
        Ok(all)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
