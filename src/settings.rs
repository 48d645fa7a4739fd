//! Parser settings persistence.
//!
//! This module handles loading and saving the tunable parse parameters.
//! Missing fields fall back to their defaults, so an old or partial
//! `settings.json` keeps working.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::{DEFAULT_SAMPLE_SIZE, DEFAULT_WINDOW};
use crate::parsers::measurement::DEFAULT_LEVEL_CEILING;

/// Errors raised while persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Parse parameters that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Window below the serving level for active-set membership (dB)
    #[serde(default = "default_active_set_window")]
    pub active_set_window: f64,
    /// Number of leading samples used for technology detection
    #[serde(default = "default_technology_sample_size")]
    pub technology_sample_size: usize,
    /// Serving levels above this are discarded as corrupt
    #[serde(default = "default_level_ceiling")]
    pub level_ceiling: f64,
}

fn default_version() -> u32 {
    1
}

fn default_active_set_window() -> f64 {
    DEFAULT_WINDOW
}

fn default_technology_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_level_ceiling() -> f64 {
    DEFAULT_LEVEL_CEILING
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            active_set_window: default_active_set_window(),
            technology_sample_size: default_technology_sample_size(),
            level_ceiling: default_level_ceiling(),
        }
    }
}

impl ParserSettings {
    /// Get the config directory path for drivelog
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("DriveLog"))
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs::config_dir().map(|p| p.join("drivelog"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the platform config directory
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file. A missing or unreadable file
    /// yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the platform config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}
