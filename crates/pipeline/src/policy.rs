//! Variable-to-colormap assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use viz_common::{VizError, VizResult};

/// Immutable mapping from variable names to colormap names.
///
/// Lookups are case-insensitive on the variable name; unknown variables fall
/// back to the policy's default colormap. The resolved name is a colormap
/// identifier for [`renderer::colormap::by_name`], which is itself exact
/// match, so entry values must use the canonical casing ("Blues", not
/// "blues").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColormapPolicy {
    /// Keys are stored lowercased.
    entries: HashMap<String, String>,
    default: String,
}

impl Default for ColormapPolicy {
    /// The stock assignment for the forecast fields this service usually
    /// sees. Anything else renders with viridis.
    fn default() -> Self {
        Self::new(
            [
                ("t2", "plasma"),
                ("rainc", "Blues"),
                ("rainnc", "YlGnBu"),
                ("rh2", "YlGnBu"),
                ("u10m", "RdBu"),
                ("v10m", "PiYG"),
            ],
            "viridis",
        )
    }
}

impl ColormapPolicy {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>, default: impl Into<String>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v.into()))
            .collect();
        Self {
            entries,
            default: default.into(),
        }
    }

    /// Load a policy from a JSON document of the form
    /// `{"entries": {"t2": "plasma"}, "default": "viridis"}`.
    pub fn from_json(json: &str) -> VizResult<Self> {
        #[derive(Deserialize)]
        struct Raw {
            entries: HashMap<String, String>,
            default: String,
        }
        let raw: Raw = serde_json::from_str(json)
            .map_err(|e| VizError::InvalidConfig(format!("colormap policy: {}", e)))?;
        Ok(Self::new(raw.entries, raw.default))
    }

    /// Colormap name for a variable, falling back to the default.
    pub fn resolve(&self, variable: &str) -> &str {
        self.entries
            .get(&variable.to_lowercase())
            .unwrap_or(&self.default)
    }

    pub fn default_colormap(&self) -> &str {
        &self.default
    }
}
