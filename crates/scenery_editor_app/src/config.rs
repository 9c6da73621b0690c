// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Read from `scenery_editor.ron` in the working directory. A missing file
//! means defaults; a malformed one is reported and also falls back to
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "scenery_editor.ron";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON write error
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window title
    pub window_title: String,
    /// Initial window size in logical pixels
    pub window_size: (u32, u32),
    /// Share of the window width given to the side panels
    pub side_panel_fraction: f32,
    /// Prefix for generated layer names
    pub new_layer_prefix: String,
    /// Log filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Scene opened at startup
    pub startup_scene: Option<PathBuf>,
    /// Scene path used by "Save" when the scene was never saved
    pub default_scene_path: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window_title: "Scenery Editor".to_string(),
            window_size: (1280, 800),
            side_panel_fraction: 0.28,
            new_layer_prefix: "layer".to_string(),
            log_filter: "info,scenery_editor_app=debug".to_string(),
            startup_scene: None,
            default_scene_path: PathBuf::from("scene.ron"),
        }
    }
}

impl EditorConfig {
    /// Parse a config from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_ron(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the config to `path`
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved editor settings to {:?}", path);
        Ok(())
    }
}
