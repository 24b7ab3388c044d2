//! Artifact persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;
use viz_common::{ArtifactHandle, ArtifactKind, VizError, VizResult};

/// Destination for rendered artifacts. The pipeline hands over finished
/// bytes and a role; the sink picks the location and returns a handle the
/// caller can publish.
pub trait ArtifactSink {
    fn store(&self, kind: ArtifactKind, bytes: &[u8]) -> VizResult<ArtifactHandle>;
}

/// Filesystem sink rooted at a media directory, handing back URL-style
/// handles under a base URL.
///
/// Layout under the root:
/// - images at `outputs/{uuid}.png`
/// - per-variable tables at `csvs/{uuid}.csv`
/// - combined tables at `csvs/{uuid}_combined.csv`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    base_url: String,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative_path(kind: ArtifactKind, id: Uuid) -> String {
        match kind {
            ArtifactKind::Image => format!("outputs/{}.{}", id, kind.extension()),
            ArtifactKind::Table => format!("csvs/{}.{}", id, kind.extension()),
            ArtifactKind::CombinedTable => format!("csvs/{}_combined.{}", id, kind.extension()),
        }
    }
}

impl ArtifactSink for DirectorySink {
    fn store(&self, kind: ArtifactKind, bytes: &[u8]) -> VizResult<ArtifactHandle> {
        let rel = Self::relative_path(kind, Uuid::new_v4());
        let path = self.root.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes).map_err(|e| {
            VizError::ArtifactWrite(format!("writing {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "stored artifact");
        Ok(ArtifactHandle::new(format!("{}/{}", self.base_url, rel)))
    }
}
