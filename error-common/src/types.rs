use thiserror::Error;

/// Simplified error enum for common use cases
#[derive(Error, Debug)]
pub enum RustCareError {
    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Business logic errors
    #[error("Business logic error: {0}")]
    BusinessError(String),

    /// External collaborator errors
    #[error("External service error: {0}")]
    ExternalError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RustCareError {
    /// Short category label used as a structured logging field.
    pub fn error_type(&self) -> &'static str {
        match self {
            RustCareError::ValidationError(_) => "validation",
            RustCareError::BusinessError(_) => "business",
            RustCareError::ExternalError(_) => "external",
            RustCareError::ConfigError(_) => "config",
            RustCareError::InternalError(_) => "internal",
            RustCareError::Other(_) => "other",
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, RustCareError>;
