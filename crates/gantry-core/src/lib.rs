pub mod error;
pub mod policy;
pub mod workload;

pub use error::{CoreError, ErrorCategory, Result};
pub use policy::{PortProtocol, PullPolicy};
pub use workload::{
    EnvVar, PortSpec, RecordId, ResourceBounds, WorkloadDescriptor, WorkloadRecord,
};
