//! Kubernetes cluster gateway for Gantry
//!
//! Implements the [`ClusterGateway`] contract on top of the Kubernetes API
//! server. Workloads managed by Gantry materialize as Deployments in the
//! target namespace.
//!
//! ## Usage
//!
//! ```ignore
//! use gantry_kube::create_cluster_gateway;
//!
//! let gateway = create_cluster_gateway().await?;
//! ```

pub mod gateway;

pub use gateway::KubeGateway;

// Re-export commonly used types from gantry-cluster
pub use gantry_cluster::{ClusterGateway, ClusterManifest, DynClusterGateway, GatewayError};

/// Creates a cluster gateway from the ambient Kubernetes configuration.
///
/// # Errors
///
/// Returns a connection error if no usable client configuration is found.
pub async fn create_cluster_gateway() -> Result<DynClusterGateway, GatewayError> {
    let gateway = KubeGateway::try_default().await?;
    Ok(std::sync::Arc::new(gateway))
}
