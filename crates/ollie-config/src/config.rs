//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level ride configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Input settings.
    pub input: InputConfig,
    /// Camera rig settings.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse sensitivity multiplier applied to the collector's base rate.
    pub mouse_sensitivity: f32,
    /// Invert the vertical orbit axis.
    pub invert_y: bool,
    /// Right-stick orbit rate in radians per second at full deflection.
    pub stick_orbit_rate: f32,
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Camera rig configuration. These only cover the values the host camera
/// component does not carry itself; the per-camera follow offsets and FOV
/// multipliers come through the host surface at rig start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Fallback follow distance behind the board, in meters, used when the
    /// host camera's configured offset is degenerate.
    pub fallback_offset_back: f32,
    /// Fallback follow height above the board, in meters.
    pub fallback_offset_up: f32,
    /// Minimum FOV multiplier change rate, per second.
    pub fov_rate_floor: f32,
    /// Radius of the camera collision sweep, in meters.
    pub collision_radius: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g. "debug", "info", "warn").
    pub log_level: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.0,
            invert_y: false,
            stick_orbit_rate: 2.6,
            keybindings: HashMap::new(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fallback_offset_back: 3.2,
            fallback_offset_up: 1.45,
            fov_rate_floor: 2.5,
            collision_radius: 0.25,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The platform config directory for the ride layer.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ollie")
}

impl Config {
    /// Loads config from the given directory, or creates a default file.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed,
    /// or when the default cannot be written.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Saves config to the given directory as `config.ron`.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be written.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` when the file changed.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
