//! Error types for NetCDF classic parsing.

use thiserror::Error;

/// Result type for CDF parser operations.
pub type CdfResult<T> = Result<T, CdfError>;

/// Error types for NetCDF classic parsing.
#[derive(Error, Debug)]
pub enum CdfError {
    #[error("Not a NetCDF classic file (bad magic)")]
    InvalidMagic,

    #[error("Unsupported NetCDF version byte: {0}")]
    UnsupportedVersion(u8),

    #[error("Streaming files (indeterminate numrecs) are not supported")]
    Streaming,

    #[error("Truncated file while reading {0}")]
    Truncated(&'static str),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
