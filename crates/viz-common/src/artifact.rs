//! Artifact references produced by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a written artifact, typically a URL or path.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactHandle(pub String);

impl ArtifactHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical role of a stored artifact. The sink decides where each role
/// lives; the pipeline only names the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Rendered raster image for one variable.
    Image,
    /// Per-variable CSV table.
    Table,
    /// Combined CSV table across all merged variables.
    CombinedTable,
}

impl ArtifactKind {
    /// File extension used for this artifact role.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Image => "png",
            ArtifactKind::Table | ArtifactKind::CombinedTable => "csv",
        }
    }
}
