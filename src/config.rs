//! Studio Configuration
//!
//! Configuration can be loaded from:
//! - Default values
//! - Config file (~/.config/flow-studio/config.toml)
//! - Home Manager (NixOS), which writes the same file

use crate::canvas::{LayoutConfig, ThemeKind};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Canvas appearance
    pub canvas: CanvasConfig,

    /// Layout constants
    pub layout: LayoutConfig,
}

/// Canvas appearance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Whether to draw the background grid
    pub show_grid: bool,

    /// Grid spacing in world units
    pub grid_size: f32,

    /// Whether to show the toolbar
    pub show_toolbar: bool,

    /// Base palette
    pub theme: ThemeKind,

    /// Optional accent color override ("#rrggbb")
    pub accent: Option<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: 24.0,
            show_toolbar: true,
            theme: ThemeKind::Dark,
            accent: None,
        }
    }
}

impl StudioConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("flow-studio/config.toml"))
            .unwrap_or_else(|| PathBuf::from("flow-studio.toml"))
    }

    /// Load configuration from the default file, falling back to defaults
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
