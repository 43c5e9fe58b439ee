//! Cluster abstraction layer for Gantry
//!
//! This crate defines the contract between the reconciliation engine and the
//! orchestration cluster, together with the pure translation from workload
//! descriptors to cluster manifests.
//!
//! ## Overview
//!
//! Two pieces live here:
//!
//! - [`build_manifest`]: a deterministic function from a
//!   [`WorkloadDescriptor`](gantry_core::WorkloadDescriptor) to a
//!   [`ClusterManifest`], applying the naming, labelling, and resource
//!   conventions every Gantry-managed workload shares.
//! - [`ClusterGateway`]: the async capability trait a concrete cluster
//!   client implements. The engine only ever talks to the cluster through
//!   this trait, so backends can be swapped without touching the engine.
//!
//! ## Example
//!
//! ```ignore
//! use gantry_cluster::{build_manifest, manifest_name};
//! use gantry_core::WorkloadDescriptor;
//!
//! let descriptor = WorkloadDescriptor::new("svc-a", "team-1", "repo/app:1.0");
//! let manifest = build_manifest(&descriptor);
//! assert_eq!(manifest_name(&manifest), "svc-a");
//! ```

pub mod gateway;
pub mod manifest;

// Re-export main types for convenience
pub use gateway::{ClusterGateway, GatewayError};
pub use manifest::{APP_LABEL, build_manifest, manifest_name, manifest_namespace};

/// The manifest type submitted to the cluster.
///
/// Gantry workloads materialize as Deployments; the alias keeps the rest of
/// the workspace from naming the Kubernetes type directly.
pub type ClusterManifest = k8s_openapi::api::apps::v1::Deployment;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Type alias for a shared cluster gateway
pub type DynClusterGateway = std::sync::Arc<dyn ClusterGateway>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::gateway::{ClusterGateway, GatewayError};
    pub use crate::manifest::{APP_LABEL, build_manifest, manifest_name, manifest_namespace};
    pub use crate::{ClusterManifest, DynClusterGateway, GatewayResult};
}
