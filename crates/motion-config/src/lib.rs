//! Motion engine configuration system
//!
//! This crate provides centralized configuration for the motion engine,
//! loading animation defaults from `motion.toml` so hosts can tune timing
//! behavior without recompiling.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the motion engine
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Animation timing defaults
    pub animation: AnimationConfig,
}

/// Animation timing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Default animation duration in seconds
    pub duration: f32,
    /// Default named easing (e.g. "linear", "ease_out_quad").
    /// `None` falls back to the engine's built-in default.
    pub easing: Option<String>,
    /// Number of discrete sub-steps the custom sampler divides a
    /// duration into
    pub precision: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            easing: None,
            precision: 100,
        }
    }
}

impl MotionConfig {
    /// Load configuration from the given TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the given path, falling back to defaults
    /// if the file does not exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}
