//! Error types for projection handling.

use thiserror::Error;

/// Errors raised while resolving a projection definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The definition names a projection that is not implemented.
    #[error("unsupported projection definition: {0}")]
    UnsupportedDefinition(String),

    /// A parameter is missing or could not be parsed.
    #[error("invalid projection parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

impl ProjectionError {
    /// Create an UnsupportedDefinition error.
    pub fn unsupported(definition: impl Into<String>) -> Self {
        Self::UnsupportedDefinition(definition.into())
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
