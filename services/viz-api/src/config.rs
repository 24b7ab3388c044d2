//! Service configuration.

use std::env;
use std::path::PathBuf;

/// Runtime configuration for the viz-api service, loaded from environment
/// variables with local-development defaults.
#[derive(Debug, Clone)]
pub struct VizApiConfig {
    /// Directory holding uploads and produced artifacts.
    pub media_root: PathBuf,
    /// URL prefix under which `media_root` is served.
    pub media_base_url: String,
}

impl VizApiConfig {
    pub fn from_env() -> Self {
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
        let media_base_url = env::var("MEDIA_BASE_URL").unwrap_or_else(|_| "/media".to_string());

        Self {
            media_root: PathBuf::from(media_root),
            media_base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only meaningful when the variables are unset, as in CI.
        if env::var("MEDIA_ROOT").is_err() && env::var("MEDIA_BASE_URL").is_err() {
            let config = VizApiConfig::from_env();
            assert_eq!(config.media_root, PathBuf::from("./media"));
            assert_eq!(config.media_base_url, "/media");
        }
    }
}
