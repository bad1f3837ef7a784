//! Process-wide configuration
//!
//! Components read two flags from here: whether motion should be reduced
//! (all scrolling becomes instant) and the font-size multiplier used to scale
//! pixel thresholds such as breakpoint widths.
//!
//! # Example
//!
//! ```ignore
//! use slidekit_core::config::{set_global_config, Config};
//!
//! let config = Config::from_toml_str("reduce_motion = true")?;
//! set_global_config(config);
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Global config, installed once at startup
static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// Install the process-wide config
///
/// # Panics
///
/// Panics if called more than once.
pub fn set_global_config(config: Config) {
    tracing::debug!(
        reduce_motion = config.reduce_motion,
        font_size_multiplier = config.font_size_multiplier,
        "installing global config"
    );
    if GLOBAL_CONFIG.set(config).is_err() {
        panic!("set_global_config() called more than once");
    }
}

/// Try to get the global config (returns None if not installed)
pub fn try_global_config() -> Option<Config> {
    GLOBAL_CONFIG.get().cloned()
}

/// The global config, or the defaults when none was installed
pub fn global_config() -> Config {
    try_global_config().unwrap_or_default()
}

/// Feature flags shared by every component
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Skip scroll animations and jump straight to the target
    pub reduce_motion: bool,
    /// Root font size relative to 16px; scales breakpoint widths
    pub font_size_multiplier: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self::standard()
    }
}

impl Config {
    /// Standard configuration: animated, unscaled.
    pub fn standard() -> Self {
        Self {
            reduce_motion: false,
            font_size_multiplier: 1.0,
        }
    }

    /// Configuration for users who asked for reduced motion.
    pub fn reduced_motion() -> Self {
        Self {
            reduce_motion: true,
            ..Self::standard()
        }
    }

    /// Parse from TOML text, validating ranges.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable reduced motion.
    pub fn with_reduce_motion(mut self, reduce: bool) -> Self {
        self.reduce_motion = reduce;
        self
    }

    /// Set the font-size multiplier; non-positive or non-finite values are
    /// ignored.
    pub fn with_font_size_multiplier(mut self, multiplier: f32) -> Self {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.font_size_multiplier = multiplier;
        } else {
            tracing::warn!(multiplier, "ignoring invalid font size multiplier");
        }
        self
    }

    /// Scale a pixel threshold by the font-size multiplier.
    pub fn scale_px(&self, px: f32) -> f32 {
        px * self.font_size_multiplier
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.font_size_multiplier.is_finite() || self.font_size_multiplier <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "font_size_multiplier",
                reason: format!("expected a positive number, got {}", self.font_size_multiplier),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.reduce_motion);
        assert_eq!(config.font_size_multiplier, 1.0);
        assert_eq!(config.scale_px(600.0), 600.0);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml_str("font_size_multiplier = 1.25").unwrap();
        assert!(!config.reduce_motion);
        assert_eq!(config.scale_px(800.0), 1000.0);

        let config = Config::from_toml_str("reduce_motion = true").unwrap();
        assert_eq!(config, Config::reduced_motion());
    }

    #[test]
    fn test_from_toml_rejects_bad_multiplier() {
        let err = Config::from_toml_str("font_size_multiplier = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "font_size_multiplier",
                ..
            }
        ));
        assert!(Config::from_toml_str("reduce_motion = \"yes\"").is_err());
    }

    #[test]
    fn test_builder_ignores_bad_multiplier() {
        let config = Config::default()
            .with_font_size_multiplier(1.5)
            .with_font_size_multiplier(0.0)
            .with_font_size_multiplier(f32::NAN)
            .with_font_size_multiplier(-2.0);
        assert_eq!(config.font_size_multiplier, 1.5);
        assert_eq!(config.scale_px(f32::INFINITY), f32::INFINITY);
    }
}
