//! Lifecycle orchestration across the cluster gateway and the record store.

use gantry_cluster::{DynClusterGateway, build_manifest};
use gantry_core::{RecordId, WorkloadDescriptor, WorkloadRecord};
use gantry_storage::{DynRecordStore, StorageError};
use tracing::{info, instrument, warn};

use crate::error::ReconcileError;

/// Drives cluster and record mutations for the workload lifecycle.
///
/// The reconciler holds no state beyond its two dependencies; every call is
/// an independent check-act sequence. Mutations always hit the cluster
/// first and the record store second, so after a partial failure the
/// cluster is the side that holds the newer truth.
///
/// There is no locking and no retry here. Concurrent calls for the same
/// (name, namespace) can race between the existence check and the mutating
/// call; the loser surfaces an opaque cluster error.
pub struct WorkloadReconciler {
    gateway: DynClusterGateway,
    store: DynRecordStore,
}

impl WorkloadReconciler {
    /// Creates a reconciler over the given gateway and store.
    #[must_use]
    pub fn new(gateway: DynClusterGateway, store: DynRecordStore) -> Self {
        Self { gateway, store }
    }

    /// Creates the workload in the cluster, then records it.
    ///
    /// Returns the surrogate ID assigned by the record store.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::AlreadyExists`] if the identity is live in
    /// the cluster (the store receives no write in that case),
    /// [`ReconcileError::ClusterOperationFailed`] if the control plane
    /// fails, and [`ReconcileError::RecordPersistFailed`] if the record
    /// insert fails after the cluster create succeeded. In the last case
    /// the cluster workload is left in place with no matching record.
    #[instrument(
        skip(self, descriptor),
        fields(name = %descriptor.name, namespace = %descriptor.namespace)
    )]
    pub async fn create(
        &self,
        descriptor: &WorkloadDescriptor,
    ) -> Result<RecordId, ReconcileError> {
        let manifest = build_manifest(descriptor);
        let name = descriptor.name.as_str();
        let namespace = descriptor.namespace.as_str();

        if self.gateway.get(namespace, name).await?.is_some() {
            return Err(ReconcileError::already_exists(name, namespace));
        }

        self.gateway.create(&manifest).await?;
        info!("Created cluster workload");

        let record = WorkloadRecord::from_descriptor(descriptor);
        match self.store.create(&record).await {
            Ok(id) => {
                info!(id, "Created workload record");
                Ok(id)
            }
            Err(e) => {
                warn!("Cluster workload created but record insert failed");
                Err(ReconcileError::RecordPersistFailed(e))
            }
        }
    }

    /// Replaces the cluster workload, then merges the change into its
    /// record.
    ///
    /// The descriptor addresses the cluster side by (name, namespace) and
    /// the record by its `id` field.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::NotFound`] if the identity is not live in
    /// the cluster or no record can be located for the descriptor's ID,
    /// [`ReconcileError::ClusterOperationFailed`] if the control plane
    /// fails, and [`ReconcileError::RecordPersistFailed`] if the record
    /// write fails after the cluster was already updated.
    #[instrument(
        skip(self, descriptor),
        fields(name = %descriptor.name, namespace = %descriptor.namespace)
    )]
    pub async fn update(&self, descriptor: &WorkloadDescriptor) -> Result<(), ReconcileError> {
        let manifest = build_manifest(descriptor);
        let name = descriptor.name.as_str();
        let namespace = descriptor.namespace.as_str();

        if self.gateway.get(namespace, name).await?.is_none() {
            return Err(ReconcileError::not_found(format!("{namespace}/{name}")));
        }

        self.gateway.update(&manifest).await?;
        info!("Updated cluster workload");

        let Some(id) = descriptor.id else {
            warn!("Cluster workload updated but descriptor carries no record id");
            return Err(ReconcileError::not_found(format!(
                "record for {namespace}/{name}"
            )));
        };

        let mut record = match self.store.find_by_id(id).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                warn!(id, "Cluster workload updated but record is missing");
                return Err(ReconcileError::not_found(format!("record {id}")));
            }
            Err(e) => return Err(ReconcileError::RecordPersistFailed(e)),
        };

        record.apply_descriptor(descriptor);
        match self.store.update(&record).await {
            Ok(()) => {
                info!(id, "Updated workload record");
                Ok(())
            }
            Err(e) => {
                warn!(id, "Cluster workload updated but record write failed");
                Err(ReconcileError::RecordPersistFailed(e))
            }
        }
    }

    /// Deletes the cluster workload addressed by a record, then the record
    /// itself.
    ///
    /// The record supplies the (name, namespace) identity. It is removed
    /// only once the cluster delete has returned success; a cluster failure
    /// leaves the record intact.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::NotFound`] if no record exists for `id`,
    /// [`ReconcileError::ClusterOperationFailed`] if the cluster delete
    /// fails, and [`ReconcileError::RecordPersistFailed`] if the record
    /// removal fails after the cluster delete succeeded.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<(), ReconcileError> {
        let record = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| record_lookup_error(id, e))?;
        let name = record.name.as_str();
        let namespace = record.namespace.as_str();

        self.gateway.delete(namespace, name).await?;
        info!(%namespace, %name, "Deleted cluster workload");

        match self.store.delete(id).await {
            Ok(()) => {
                info!("Deleted workload record");
                Ok(())
            }
            Err(e) => {
                warn!("Cluster workload deleted but record removal failed");
                Err(ReconcileError::RecordPersistFailed(e))
            }
        }
    }

    /// Fetches a single record.
    ///
    /// No cluster interaction; the record may lag live cluster state across
    /// the failure windows documented on the mutating calls.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::NotFound`] if no record exists for `id`.
    #[instrument(skip(self))]
    pub async fn find(&self, id: RecordId) -> Result<WorkloadRecord, ReconcileError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| record_lookup_error(id, e))
    }

    /// Fetches every record, ordered by surrogate ID.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::RecordPersistFailed`] if the store read
    /// fails.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<WorkloadRecord>, ReconcileError> {
        self.store
            .find_all()
            .await
            .map_err(ReconcileError::RecordPersistFailed)
    }
}

fn record_lookup_error(id: RecordId, err: StorageError) -> ReconcileError {
    if err.is_not_found() {
        ReconcileError::not_found(format!("record {id}"))
    } else {
        ReconcileError::RecordPersistFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gantry_cluster::{
        ClusterGateway, ClusterManifest, GatewayError, manifest_name, manifest_namespace,
    };
    use gantry_core::PortProtocol;
    use gantry_db_memory::InMemoryRecordStore;
    use gantry_storage::RecordStore;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn key(namespace: &str, name: &str) -> (String, String) {
        (namespace.to_string(), name.to_string())
    }

    /// Scriptable in-process gateway holding live manifests by identity.
    #[derive(Default)]
    struct StubGateway {
        live: Mutex<HashMap<(String, String), ClusterManifest>>,
        fail_create: bool,
        fail_update: bool,
        fail_delete: bool,
        create_calls: AtomicUsize,
        update_calls: AtomicUsize,
    }

    impl StubGateway {
        fn new() -> Self {
            Self::default()
        }

        fn seed(&self, namespace: &str, name: &str) {
            let manifest = build_manifest(&WorkloadDescriptor::new(name, namespace, "seed:1"));
            self.live.lock().unwrap().insert(key(namespace, name), manifest);
        }

        fn contains(&self, namespace: &str, name: &str) -> bool {
            self.live.lock().unwrap().contains_key(&key(namespace, name))
        }

        fn manifest_for(&self, namespace: &str, name: &str) -> Option<ClusterManifest> {
            self.live.lock().unwrap().get(&key(namespace, name)).cloned()
        }
    }

    #[async_trait]
    impl ClusterGateway for StubGateway {
        async fn get(
            &self,
            namespace: &str,
            name: &str,
        ) -> Result<Option<ClusterManifest>, GatewayError> {
            Ok(self.manifest_for(namespace, name))
        }

        async fn create(&self, manifest: &ClusterManifest) -> Result<(), GatewayError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(GatewayError::api("create refused"));
            }
            let k = key(manifest_namespace(manifest), manifest_name(manifest));
            self.live.lock().unwrap().insert(k, manifest.clone());
            Ok(())
        }

        async fn update(&self, manifest: &ClusterManifest) -> Result<(), GatewayError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_update {
                return Err(GatewayError::api("update refused"));
            }
            let k = key(manifest_namespace(manifest), manifest_name(manifest));
            self.live.lock().unwrap().insert(k, manifest.clone());
            Ok(())
        }

        async fn delete(&self, namespace: &str, name: &str) -> Result<(), GatewayError> {
            if self.fail_delete {
                return Err(GatewayError::connection("control plane unreachable"));
            }
            self.live.lock().unwrap().remove(&key(namespace, name));
            Ok(())
        }
    }

    /// Record store wrapper that fails selected operations.
    struct FailingStore {
        inner: Arc<InMemoryRecordStore>,
        fail_create: bool,
        fail_update: bool,
        fail_delete: bool,
    }

    impl FailingStore {
        fn wrapping(inner: Arc<InMemoryRecordStore>) -> Self {
            Self {
                inner,
                fail_create: false,
                fail_update: false,
                fail_delete: false,
            }
        }
    }

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn create(&self, record: &WorkloadRecord) -> Result<RecordId, StorageError> {
            if self.fail_create {
                return Err(StorageError::internal("insert refused"));
            }
            self.inner.create(record).await
        }

        async fn update(&self, record: &WorkloadRecord) -> Result<(), StorageError> {
            if self.fail_update {
                return Err(StorageError::internal("write refused"));
            }
            self.inner.update(record).await
        }

        async fn delete(&self, id: RecordId) -> Result<(), StorageError> {
            if self.fail_delete {
                return Err(StorageError::internal("delete refused"));
            }
            self.inner.delete(id).await
        }

        async fn find_by_id(&self, id: RecordId) -> Result<WorkloadRecord, StorageError> {
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<WorkloadRecord>, StorageError> {
            self.inner.find_all().await
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    fn descriptor(name: &str) -> WorkloadDescriptor {
        WorkloadDescriptor::new(name, "default", "nginx:1.21")
            .with_replicas(2)
            .with_port(80, PortProtocol::Tcp)
            .with_resources(1.0, 512.0)
    }

    fn reconciler_with(
        gateway: Arc<StubGateway>,
        store: Arc<InMemoryRecordStore>,
    ) -> WorkloadReconciler {
        WorkloadReconciler::new(gateway, store)
    }

    #[tokio::test]
    async fn test_create_returns_nonzero_id() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store.clone());

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();
        assert!(id > 0);
        assert!(gateway.contains("default", "svc-a"));
    }

    #[tokio::test]
    async fn test_create_round_trips_descriptor_through_find() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway, store);

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();
        let record = reconciler.find(id).await.unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.name, "svc-a");
        assert_eq!(record.namespace, "default");
        assert_eq!(record.image, "nginx:1.21");
        assert_eq!(record.replicas, 2);
        assert_eq!(record.ports.len(), 1);
        assert_eq!(record.ports[0].port, 80);
        assert_eq!(record.resources.cpu_max, 1.0);
        assert_eq!(record.resources.memory_max, 512.0);
    }

    #[tokio::test]
    async fn test_create_submits_built_manifest() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store);

        reconciler.create(&descriptor("svc-a")).await.unwrap();

        let manifest = gateway.manifest_for("default", "svc-a").unwrap();
        let spec = manifest.spec.unwrap();
        assert_eq!(spec.replicas, Some(2));

        let pod = spec.template.spec.unwrap();
        let container = &pod.containers[0];
        let resources = container.resources.clone().unwrap();
        let limits = resources.limits.unwrap();
        let requests = resources.requests.unwrap();
        assert_eq!(limits["cpu"].0, "1");
        assert_eq!(limits["memory"].0, "512");
        assert_eq!(requests["cpu"].0, "0.5");
        assert_eq!(requests["memory"].0, "256");

        let ports = container.ports.clone().unwrap();
        assert_eq!(ports[0].container_port, 80);
        assert_eq!(ports[0].name.as_deref(), Some("port-80"));
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
    }

    #[tokio::test]
    async fn test_create_rejects_live_identity() {
        let gateway = Arc::new(StubGateway::new());
        gateway.seed("default", "svc-a");
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store.clone());

        let err = reconciler.create(&descriptor("svc-a")).await.unwrap_err();
        assert!(err.is_already_exists());

        // neither side was touched
        assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_cluster_failure_leaves_store_untouched() {
        let gateway = Arc::new(StubGateway {
            fail_create: true,
            ..StubGateway::new()
        });
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway, store.clone());

        let err = reconciler.create(&descriptor("svc-a")).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ClusterOperationFailed(_)));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_record_failure_leaves_cluster_object() {
        let gateway = Arc::new(StubGateway::new());
        let inner = Arc::new(InMemoryRecordStore::new());
        let store = Arc::new(FailingStore {
            fail_create: true,
            ..FailingStore::wrapping(inner.clone())
        });
        let reconciler = WorkloadReconciler::new(gateway.clone(), store);

        let err = reconciler.create(&descriptor("svc-a")).await.unwrap_err();
        assert!(matches!(err, ReconcileError::RecordPersistFailed(_)));

        // the cluster object stays; the orphan is the caller's to observe
        assert!(gateway.contains("default", "svc-a"));
        assert!(inner.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_absent_identity_is_not_found() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store);

        let err = reconciler
            .update(&descriptor("svc-a").with_id(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(gateway.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_merges_into_record() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store.clone());

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();

        let changed = WorkloadDescriptor::new("svc-a", "default", "nginx:1.25")
            .with_id(id)
            .with_replicas(4)
            .with_resources(2.0, 1024.0);
        reconciler.update(&changed).await.unwrap();

        let record = reconciler.find(id).await.unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.image, "nginx:1.25");
        assert_eq!(record.replicas, 4);
        assert_eq!(record.resources.memory_max, 1024.0);
        assert!(record.updated_at >= record.created_at);

        let manifest = gateway.manifest_for("default", "svc-a").unwrap();
        let pod = manifest.spec.unwrap().template.spec.unwrap();
        assert_eq!(pod.containers[0].image.as_deref(), Some("nginx:1.25"));
    }

    #[tokio::test]
    async fn test_update_without_record_id_is_not_found() {
        let gateway = Arc::new(StubGateway::new());
        gateway.seed("default", "svc-a");
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store);

        let err = reconciler.update(&descriptor("svc-a")).await.unwrap_err();
        assert!(err.is_not_found());

        // the cluster write had already happened by the time the id was
        // found missing
        assert_eq!(gateway.update_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let gateway = Arc::new(StubGateway::new());
        gateway.seed("default", "svc-a");
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway, store);

        let err = reconciler
            .update(&descriptor("svc-a").with_id(999))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_record_write_failure_reports_persist_error() {
        let gateway = Arc::new(StubGateway::new());
        let inner = Arc::new(InMemoryRecordStore::new());
        let store = Arc::new(FailingStore {
            fail_update: true,
            ..FailingStore::wrapping(inner)
        });
        let reconciler = WorkloadReconciler::new(gateway, store);

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();
        let err = reconciler
            .update(&descriptor("svc-a").with_id(id))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::RecordPersistFailed(_)));
    }

    #[tokio::test]
    async fn test_delete_unknown_record_is_not_found() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway, store);

        let err = reconciler.delete(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cluster_failure_keeps_record() {
        let gateway = Arc::new(StubGateway {
            fail_delete: true,
            ..StubGateway::new()
        });
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway, store);

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();
        let err = reconciler.delete(id).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ClusterOperationFailed(_)));

        // the record must still be retrievable
        assert_eq!(reconciler.find(id).await.unwrap().name, "svc-a");
    }

    #[tokio::test]
    async fn test_delete_removes_cluster_object_then_record() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway.clone(), store);

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();
        reconciler.delete(id).await.unwrap();

        assert!(!gateway.contains("default", "svc-a"));
        assert!(reconciler.find(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_record_removal_failure_reports_persist_error() {
        let gateway = Arc::new(StubGateway::new());
        let inner = Arc::new(InMemoryRecordStore::new());
        let store = Arc::new(FailingStore {
            fail_delete: true,
            ..FailingStore::wrapping(inner.clone())
        });
        let reconciler = WorkloadReconciler::new(gateway.clone(), store);

        let id = reconciler.create(&descriptor("svc-a")).await.unwrap();
        let err = reconciler.delete(id).await.unwrap_err();
        assert!(matches!(err, ReconcileError::RecordPersistFailed(_)));

        // cluster side is gone, record lingers
        assert!(!gateway.contains("default", "svc-a"));
        assert!(inner.find_by_id(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_all_returns_records_in_id_order() {
        let gateway = Arc::new(StubGateway::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let reconciler = reconciler_with(gateway, store);

        let a = reconciler.create(&descriptor("svc-a")).await.unwrap();
        let b = reconciler.create(&descriptor("svc-b")).await.unwrap();
        let c = reconciler.create(&descriptor("svc-c")).await.unwrap();

        let records = reconciler.find_all().await.unwrap();
        assert_eq!(
            records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![a, b, c]
        );
        assert_eq!(records[1].name, "svc-b");
    }
}
