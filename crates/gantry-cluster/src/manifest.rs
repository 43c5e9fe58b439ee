//! Pure translation of a workload descriptor into a cluster-native
//! Deployment manifest.
//!
//! The manifest is built fresh on every call and returned by value; nothing
//! here holds state between calls, so no field from an earlier build can
//! leak into a later one.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::DeploymentSpec;
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

use crate::ClusterManifest;
use gantry_core::{ResourceBounds, WorkloadDescriptor};

/// Label key identifying the owning application on every object this
/// builder produces. The same pair is used for the Deployment metadata,
/// the selector, and the pod template, so selector and template always
/// agree.
pub const APP_LABEL: &str = "app-name";

/// Build the Deployment manifest for a descriptor.
///
/// Side-effect free. The descriptor is assumed to satisfy its structural
/// invariants already; no validation happens here.
pub fn build_manifest(descriptor: &WorkloadDescriptor) -> ClusterManifest {
    let labels = app_labels(&descriptor.name);

    ClusterManifest {
        metadata: ObjectMeta {
            name: Some(descriptor.name.clone()),
            namespace: Some(descriptor.namespace.clone()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(descriptor.replicas),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: descriptor.name.clone(),
                        image: Some(descriptor.image.clone()),
                        image_pull_policy: Some(descriptor.pull_policy.as_str().to_string()),
                        ports: Some(container_ports(descriptor)),
                        env: Some(env_vars(descriptor)),
                        resources: Some(resource_requirements(&descriptor.resources)),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Name recorded in a manifest's metadata, empty if unset.
pub fn manifest_name(manifest: &ClusterManifest) -> &str {
    manifest.metadata.name.as_deref().unwrap_or_default()
}

/// Namespace recorded in a manifest's metadata, empty if unset.
pub fn manifest_namespace(manifest: &ClusterManifest) -> &str {
    manifest.metadata.namespace.as_deref().unwrap_or_default()
}

fn app_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

fn container_ports(descriptor: &WorkloadDescriptor) -> Vec<ContainerPort> {
    descriptor
        .ports
        .iter()
        .map(|spec| ContainerPort {
            name: Some(format!("port-{}", spec.port)),
            container_port: i32::from(spec.port),
            protocol: Some(spec.protocol.as_str().to_string()),
            ..Default::default()
        })
        .collect()
}

fn env_vars(descriptor: &WorkloadDescriptor) -> Vec<EnvVar> {
    descriptor
        .env
        .iter()
        .map(|var| EnvVar {
            name: var.name.clone(),
            value: Some(var.value.clone()),
            ..Default::default()
        })
        .collect()
}

fn resource_requirements(bounds: &ResourceBounds) -> ResourceRequirements {
    ResourceRequirements {
        limits: Some(quantities(bounds.cpu_max, bounds.memory_max)),
        // The guaranteed minimum is pinned at exactly half of each maximum,
        // with no override, even when the half is degenerate.
        requests: Some(quantities(bounds.cpu_max / 2.0, bounds.memory_max / 2.0)),
        ..Default::default()
    }
}

fn quantities(cpu: f64, memory: f64) -> BTreeMap<String, Quantity> {
    BTreeMap::from([
        ("cpu".to_string(), quantity(cpu)),
        ("memory".to_string(), quantity(memory)),
    ])
}

fn quantity(value: f64) -> Quantity {
    Quantity(value.to_string())
}
