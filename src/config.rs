/// Tagger configuration
///
/// Read from `<config_dir>/bjn-tagger/config.json`, or the file named by
/// `BJN_TAGGER_CONFIG`. Every field is optional in the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, TaggerError};
use crate::state::data::Category;
use crate::state::export::DEFAULT_EXPORT_FILE;

pub const CONFIG_ENV: &str = "BJN_TAGGER_CONFIG";
pub const SITE_ROOT_ENV: &str = "BJN_TAGGER_SITE_ROOT";

/// A one-click "folder -> category" button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickTag {
    pub folder: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Directory the `/folder/file.jpg` image paths resolve against
    pub site_root: PathBuf,
    /// JSON manifest to use instead of the built-in one
    pub manifest_path: Option<PathBuf>,
    /// SQLite file holding annotations (default: user data dir)
    pub database_path: Option<PathBuf>,
    pub export_file_name: String,
    /// Photographer credit used in generated alt text
    pub credit: String,
    pub quick_tags: Vec<QuickTag>,
    /// Folders under `site_root` picked up by a manifest rescan
    pub scan_folders: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            site_root: PathBuf::from("."),
            manifest_path: None,
            database_path: None,
            export_file_name: DEFAULT_EXPORT_FILE.to_string(),
            credit: "BJN".to_string(),
            quick_tags: vec![
                QuickTag { folder: "portraits".to_string(), category: Category::Portraits },
                QuickTag { folder: "creative".to_string(), category: Category::CreativeEditorial },
            ],
            scan_folders: vec!["portraits".to_string(), "creative".to_string(), "events".to_string()],
        }
    }
}

impl TaggerConfig {
    /// Location of the config file, honoring `BJN_TAGGER_CONFIG`
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("bjn-tagger").join("config.json"))
    }

    /// Load the config, falling back to defaults on any problem.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|err| {
                warn!(error = %err, "config unusable, using defaults");
                Self::default()
            }),
            _ => Self::default(),
        };

        if let Some(root) = std::env::var_os(SITE_ROOT_ENV) {
            config.site_root = PathBuf::from(root);
        }
        config
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text).map_err(|e| TaggerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Absolute-ish file path for a site image path like `/portraits/a.jpg`
    pub fn resolve_image(&self, src: &str) -> PathBuf {
        self.site_root.join(src.trim_start_matches('/'))
    }
}
