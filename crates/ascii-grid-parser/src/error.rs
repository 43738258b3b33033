//! Error types for ASCII-grid decoding.

use raster_grid::GridError;
use thiserror::Error;

/// Result type for ASCII-grid operations.
pub type AsciiGridResult<T> = Result<T, AsciiGridError>;

/// Error types for ASCII-grid decoding.
#[derive(Error, Debug)]
pub enum AsciiGridError {
    /// A header line does not start with the expected keyword
    #[error("not a valid ASCII grid: expected '{expected}' at line {line_number}: '{line}'")]
    InvalidHeader {
        expected: &'static str,
        line: String,
        line_number: usize,
    },

    /// A header value or data token is not a number
    #[error("invalid number '{token}' at line {line_number}")]
    InvalidNumber { token: String, line_number: usize },

    /// Data does not fill the grid exactly
    #[error("ASCII grid has {actual} values, header declares {expected}")]
    DataLength { expected: usize, actual: usize },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The decoded grid was rejected
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}
