//! Engine settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Geometry constants for the timeline layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Lower bound for horizontal zoom.
    pub min_pixels_per_day: f32,
    /// Lower bound for row height.
    pub min_row_height: f32,
    /// Height reserved above the rows for the day ruler.
    pub header_height: f32,
    /// Vertical gap between a bar and its row edges.
    pub bar_inset: f32,
    /// Length of each arrowhead stroke.
    pub arrow_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_pixels_per_day: 4.0,
            min_row_height: 22.0,
            header_height: 40.0,
            bar_inset: 3.0,
            arrow_size: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo entries kept; unlimited when `None`.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Load `config.json` from the user config directory, or defaults when
    /// there is none.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// `<config dir>/GanttEngine/config.json`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "GanttEngine")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "layout": { "min_row_height": 30.0 }, "history": { "max_depth": 50 } }"#)
            .unwrap();

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config.layout.min_row_height, 30.0);
        assert_eq!(config.layout.min_pixels_per_day, 4.0);
        assert_eq!(config.history.max_depth, Some(50));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EngineConfig::load_from(&path), Err(EngineError::Config(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = EngineConfig::default();
        config.layout.arrow_size = 8.0;
        config.save_to(&path).unwrap();
        assert_eq!(EngineConfig::load_from(&path).unwrap(), config);
    }
}
