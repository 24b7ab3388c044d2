//! Error types for gridviz services.

use thiserror::Error;

/// Result type alias using VizError.
pub type VizResult<T> = Result<T, VizError>;

/// Primary error type for pipeline operations.
#[derive(Debug, Error)]
pub enum VizError {
    // === Fatal load errors (fail the whole run) ===
    #[error("Failed to open dataset: {0}")]
    DatasetOpen(String),

    #[error("Failed to read dataset: {0}")]
    DatasetRead(String),

    // === Per-variable errors (recovered by the orchestrator) ===
    #[error("Index out of range along dimension '{dim}' (length {len})")]
    OutOfRange { dim: String, len: usize },

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Table export failed: {0}")]
    Export(String),

    // === Infrastructure errors ===
    #[error("Artifact write failed: {0}")]
    ArtifactWrite(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VizError {
    /// Whether this error fails the whole run rather than a single variable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VizError::DatasetOpen(_) | VizError::DatasetRead(_) | VizError::InvalidConfig(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            VizError::DatasetOpen(_) | VizError::DatasetRead(_) => 500,
            VizError::InvalidConfig(_) => 400,
            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        VizError::ArtifactWrite(err.to_string())
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::InvalidConfig(format!("JSON error: {}", err))
    }
}
