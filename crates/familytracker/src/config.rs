//! Configuration management for familytracker.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "familytracker";

/// Environment variable prefix.
const ENV_PREFIX: &str = "FAMILYTRACKER_";

/// OpenStreetMap raster tile template.
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution required by the OpenStreetMap tile usage policy.
pub const DEFAULT_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Highest zoom level served by the default tile source.
pub const MAX_ZOOM: u8 = 19;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FAMILYTRACKER_`, nested keys
///    separated by `__`, e.g. `FAMILYTRACKER_MAP__ZOOM=10`)
/// 2. TOML config file at `~/.config/familytracker/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Map viewport and tile source.
    pub map: MapConfig,
    /// Entry form validation rules.
    pub forms: FormsConfig,
}

/// Map-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude of the initial map center.
    pub center_latitude: f64,
    /// Longitude of the initial map center.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: u8,
    /// Tile URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
    /// Attribution shown alongside the tiles.
    pub attribution: String,
}

/// Form validation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Reject coordinates that do not parse as finite numbers.
    /// When disabled, such input is stored as `NaN`.
    pub reject_non_numeric: bool,
    /// Require the shelter field on the member form.
    pub require_member_shelter: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: 28.6139,
            center_longitude: 77.209,
            zoom: 13,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            reject_non_numeric: true,
            require_member_shelter: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.map.center_latitude.is_finite() || !self.map.center_longitude.is_finite() {
            return Err(Error::config_validation(format!(
                "map center ({}, {}) must be finite",
                self.map.center_latitude, self.map.center_longitude
            )));
        }

        if self.map.zoom > MAX_ZOOM {
            return Err(Error::config_validation(format!(
                "zoom ({}) cannot be greater than {MAX_ZOOM}",
                self.map.zoom
            )));
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.map.tile_url.contains(placeholder) {
                return Err(Error::config_validation(format!(
                    "tile_url is missing the {placeholder} placeholder"
                )));
            }
        }

        Ok(())
    }
}
