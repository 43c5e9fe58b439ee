//! Kubernetes-backed implementation of [`ClusterGateway`].

use async_trait::async_trait;
use gantry_cluster::{
    ClusterGateway, ClusterManifest, GatewayError, manifest_name, manifest_namespace,
};
use kube::Client;
use kube::api::{Api, DeleteParams, PostParams};
use tracing::debug;

/// Cluster gateway backed by the Kubernetes API server.
///
/// Holds a single [`kube::Client`]; each call opens an API handle scoped to
/// the target namespace.
#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
}

impl KubeGateway {
    /// Creates a gateway from an already configured client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a gateway from the ambient Kubernetes configuration.
    ///
    /// Resolution follows the client defaults: in-cluster service account
    /// first, then the local kubeconfig.
    ///
    /// # Errors
    ///
    /// Returns a connection error if no usable configuration is found.
    pub async fn try_default() -> Result<Self, GatewayError> {
        let client = Client::try_default()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;
        Ok(Self::new(client))
    }

    fn deployments(&self, namespace: &str) -> Api<ClusterManifest> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn map_kube_error(err: kube::Error) -> GatewayError {
    match err {
        kube::Error::Api(ae) => GatewayError::api(ae.to_string()),
        other => GatewayError::connection(other.to_string()),
    }
}

#[async_trait]
impl ClusterGateway for KubeGateway {
    async fn get(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ClusterManifest>, GatewayError> {
        let api = self.deployments(namespace);
        match api.get(name).await {
            Ok(manifest) => Ok(Some(manifest)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(map_kube_error(e)),
        }
    }

    async fn create(&self, manifest: &ClusterManifest) -> Result<(), GatewayError> {
        let namespace = manifest_namespace(manifest);
        let name = manifest_name(manifest);
        debug!(%namespace, %name, "submitting deployment create");

        let api = self.deployments(namespace);
        api.create(&PostParams::default(), manifest)
            .await
            .map_err(map_kube_error)?;
        Ok(())
    }

    async fn update(&self, manifest: &ClusterManifest) -> Result<(), GatewayError> {
        let namespace = manifest_namespace(manifest);
        let name = manifest_name(manifest);
        debug!(%namespace, %name, "submitting deployment replace");

        let api = self.deployments(namespace);

        // The replace must carry the live resourceVersion; a stale version
        // fails the request with a conflict.
        let live = api.get(name).await.map_err(map_kube_error)?;
        let mut desired = manifest.clone();
        desired.metadata.resource_version = live.metadata.resource_version;

        api.replace(name, &PostParams::default(), &desired)
            .await
            .map_err(map_kube_error)?;
        Ok(())
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), GatewayError> {
        debug!(%namespace, %name, "submitting deployment delete");

        let api = self.deployments(namespace);
        api.delete(name, &DeleteParams::default())
            .await
            .map_err(map_kube_error)?;
        Ok(())
    }
}
