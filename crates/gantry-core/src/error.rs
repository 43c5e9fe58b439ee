use thiserror::Error;

/// Core error types for Gantry domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid workload name: {0}")]
    InvalidName(String),

    #[error("Invalid workload namespace: {0}")]
    InvalidNamespace(String),

    #[error("Invalid container image: {0}")]
    InvalidImage(String),

    #[error("Invalid replica count: {0}")]
    InvalidReplicas(i32),

    #[error("Invalid container port: {0}")]
    InvalidPort(u16),

    #[error("Invalid resource bounds: {message}")]
    InvalidResources { message: String },
}

impl CoreError {
    /// Create a new InvalidName error
    pub fn invalid_name(reason: impl Into<String>) -> Self {
        Self::InvalidName(reason.into())
    }

    /// Create a new InvalidNamespace error
    pub fn invalid_namespace(reason: impl Into<String>) -> Self {
        Self::InvalidNamespace(reason.into())
    }

    /// Create a new InvalidImage error
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage(reason.into())
    }

    /// Create a new InvalidResources error
    pub fn invalid_resources(message: impl Into<String>) -> Self {
        Self::InvalidResources {
            message: message.into(),
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName(_)
            | Self::InvalidNamespace(_)
            | Self::InvalidImage(_)
            | Self::InvalidReplicas(_)
            | Self::InvalidPort(_)
            | Self::InvalidResources { .. } => ErrorCategory::Validation,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
