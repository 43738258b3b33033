//! Error types for grid construction and mutation.
//!
//! Point queries never fail: a point outside the grid, or a neighbourhood
//! with missing data, yields `None` instead of an error.

use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while building or updating a grid.
#[derive(Error, Debug)]
pub enum GridError {
    /// Grid metadata is not usable (non-positive cell size, zero rows, ...).
    #[error("invalid grid parameters: {0}")]
    InvalidParams(String),

    /// The value array does not match `n_cols * n_rows`.
    #[error("value array has {actual} entries, grid expects {expected}")]
    DataLength { expected: usize, actual: usize },

    /// The u and v components cannot be combined into one vector field.
    #[error("incompatible vector components: {0}")]
    IncompatibleComponents(String),

    /// A data record could not be read.
    #[error("invalid data record: {0}")]
    InvalidRecord(String),

    /// The projection definition could not be resolved.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl GridError {
    /// Create an InvalidParams error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create an IncompatibleComponents error.
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::IncompatibleComponents(msg.into())
    }

    /// Create an InvalidRecord error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
