pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::{AppConfig, ClusterConfig, LoggingConfig, ServerConfig, StorageConfig};
pub use error::ApiError;
pub use observability::init_tracing;
pub use server::{AppState, GantryServer, ServerBuilder, build_app};
