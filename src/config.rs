//! Renderer configuration
//!
//! Read from `~/.config/gapvis/config.yaml`. Every field is optional:
//!
//! ```yaml
//! palette: slate          # builtin id, user palette id, or path to a .yaml file
//! cell_size: 16           # pixel width of one storage slot
//! font_size: 32           # pixel height of the text row
//! font: fonts/font32.ppm  # .ttf/.otf outline font or .ppm glyph sheet
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Layout and styling for rendered frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    /// Palette id or path (e.g., "paper", "slate")
    pub palette: String,
    /// Width and height of one storage slot in the block row
    pub cell_size: usize,
    /// Height of the text row in pixels
    pub font_size: usize,
    /// Outline font or PPM glyph sheet; the builtin font when unset
    pub font: Option<PathBuf>,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            palette: "paper".to_string(),
            cell_size: 16,
            font_size: 32,
            font: None,
        }
    }
}

impl AnimConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.cell_size < 2 {
            return Err(format!("cell_size must be at least 2, got {}", self.cell_size));
        }
        if self.font_size < 4 {
            return Err(format!("font_size must be at least 4, got {}", self.font_size));
        }
        Ok(())
    }
}
