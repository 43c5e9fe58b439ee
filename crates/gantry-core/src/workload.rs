use crate::error::{CoreError, Result};
use crate::policy::{PortProtocol, PullPolicy};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Numeric surrogate ID addressing a durable workload record.
///
/// Identity at the cluster boundary is the (name, namespace) pair; the
/// record store hands out this ID and it is the only handle for
/// update/delete/read of the durable side.
pub type RecordId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortSpec {
    pub port: u16,
    #[serde(default)]
    pub protocol: PortProtocol,
}

impl PortSpec {
    pub fn new(port: u16, protocol: PortProtocol) -> Self {
        Self { port, protocol }
    }

    /// TCP port shorthand, the overwhelmingly common case.
    pub fn tcp(port: u16) -> Self {
        Self::new(port, PortProtocol::Tcp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// CPU and memory maxima for a workload.
///
/// Only the maxima are carried; the guaranteed minimum is derived downstream
/// as exactly half of each maximum and is deliberately not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceBounds {
    #[serde(rename = "cpuMax")]
    pub cpu_max: f64,
    #[serde(rename = "memoryMax")]
    pub memory_max: f64,
}

impl ResourceBounds {
    pub fn new(cpu_max: f64, memory_max: f64) -> Self {
        Self {
            cpu_max,
            memory_max,
        }
    }
}

/// Request-time specification of a workload, as supplied by callers.
///
/// `id` is absent on create (the record store assigns one) and must be
/// populated for update, where it addresses the durable record to merge
/// into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub namespace: String,
    pub image: String,
    #[serde(default = "default_replicas")]
    pub replicas: i32,
    #[serde(rename = "pullPolicy", default)]
    pub pull_policy: PullPolicy,
    #[serde(default)]
    pub ports: Vec<PortSpec>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub resources: ResourceBounds,
}

fn default_replicas() -> i32 {
    1
}

impl WorkloadDescriptor {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            namespace: namespace.into(),
            image: image.into(),
            replicas: default_replicas(),
            pull_policy: PullPolicy::default(),
            ports: Vec::new(),
            env: Vec::new(),
            resources: ResourceBounds::default(),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_replicas(mut self, replicas: i32) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_pull_policy(mut self, policy: PullPolicy) -> Self {
        self.pull_policy = policy;
        self
    }

    pub fn with_port(mut self, port: u16, protocol: PortProtocol) -> Self {
        self.ports.push(PortSpec::new(port, protocol));
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvVar::new(name, value));
        self
    }

    pub fn with_resources(mut self, cpu_max: f64, memory_max: f64) -> Self {
        self.resources = ResourceBounds::new(cpu_max, memory_max);
        self
    }

    /// Check the structural invariants a descriptor must satisfy before it
    /// reaches the manifest builder or the reconciler.
    ///
    /// Neither of those validates on its own; enforcement belongs at the
    /// decoding boundary.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`CoreError`].
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_name("must not be empty"));
        }
        if self.namespace.trim().is_empty() {
            return Err(CoreError::invalid_namespace("must not be empty"));
        }
        if self.image.trim().is_empty() {
            return Err(CoreError::invalid_image("must not be empty"));
        }
        if self.replicas < 0 {
            return Err(CoreError::InvalidReplicas(self.replicas));
        }
        for port in &self.ports {
            if port.port == 0 {
                return Err(CoreError::InvalidPort(port.port));
            }
        }
        if !self.resources.cpu_max.is_finite() || self.resources.cpu_max <= 0.0 {
            return Err(CoreError::invalid_resources("cpu maximum must be positive"));
        }
        if !self.resources.memory_max.is_finite() || self.resources.memory_max <= 0.0 {
            return Err(CoreError::invalid_resources(
                "memory maximum must be positive",
            ));
        }
        Ok(())
    }
}

/// Durable representation of a workload: the surrogate ID plus the same
/// descriptive fields as [`WorkloadDescriptor`].
///
/// Owned exclusively by the record store. Timestamps are stamped by the
/// store, not by callers, and a record never claims to reflect live cluster
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub id: RecordId,
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub replicas: i32,
    #[serde(rename = "pullPolicy")]
    pub pull_policy: PullPolicy,
    pub ports: Vec<PortSpec>,
    pub env: Vec<EnvVar>,
    pub resources: ResourceBounds,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl WorkloadRecord {
    /// Build a record from a descriptor.
    ///
    /// The ID stays at the descriptor's value (zero when absent) until the
    /// record store assigns a real one on insert.
    pub fn from_descriptor(descriptor: &WorkloadDescriptor) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: descriptor.id.unwrap_or(0),
            name: descriptor.name.clone(),
            namespace: descriptor.namespace.clone(),
            image: descriptor.image.clone(),
            replicas: descriptor.replicas,
            pull_policy: descriptor.pull_policy,
            ports: descriptor.ports.clone(),
            env: descriptor.env.clone(),
            resources: descriptor.resources,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a descriptor's fields into this record, keeping the surrogate
    /// ID and creation timestamp.
    pub fn apply_descriptor(&mut self, descriptor: &WorkloadDescriptor) {
        self.name = descriptor.name.clone();
        self.namespace = descriptor.namespace.clone();
        self.image = descriptor.image.clone();
        self.replicas = descriptor.replicas;
        self.pull_policy = descriptor.pull_policy;
        self.ports = descriptor.ports.clone();
        self.env = descriptor.env.clone();
        self.resources = descriptor.resources;
    }
}
