//! Configuration file support for the dashboard.
//!
//! Preferences are stored as JSON under the platform config directory on
//! native targets and in `localStorage` in the browser.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEVEL_COUNT, MAX_LEVEL_COUNT, MIN_LEVEL_COUNT};
use crate::model::{ColorScheme, MapType, RegionLevel, VisualizationSetting};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// All log levels, least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Preferences applied to newly mounted maps and to the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Log verbosity level
    pub log_level: LogLevel,

    /// Base URL of the statistics API; map endpoints are relative to it
    pub api_base_url: String,

    /// Basemap for new maps
    pub default_map_type: MapType,

    /// Legend colour scheme for new maps
    pub default_color: ColorScheme,

    /// Legend class count for new maps
    pub default_level_count: u8,

    /// Region level new maps aggregate by
    pub default_region_level: RegionLevel,

    /// Hide urban neighbourhoods (동) on new maps
    pub exclude_dong: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            api_base_url: "/".to_string(),
            default_map_type: MapType::default(),
            default_color: ColorScheme::default(),
            default_level_count: DEFAULT_LEVEL_COUNT,
            default_region_level: RegionLevel::default(),
            exclude_dong: false,
        }
    }
}

impl Preferences {
    /// Visualization settings seeded from these preferences.
    pub fn visualization_setting(&self) -> VisualizationSetting {
        let mut setting = VisualizationSetting::default();
        setting.legend.color = self.default_color;
        setting.legend.level_count = self
            .default_level_count
            .clamp(MIN_LEVEL_COUNT, MAX_LEVEL_COUNT);
        setting
    }

    /// Full URL of a map's data endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "agrimap-config.json"
    }

    /// Load the stored configuration, falling back to defaults.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let loaded = Self::load_from_default_path();
        #[cfg(target_arch = "wasm32")]
        let loaded = Self::load_from_local_storage();

        loaded.unwrap_or_default()
    }

    /// Persist the configuration to the platform store.
    pub fn save(&self) -> Result<(), ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        return self.save_to_default_path();
        #[cfg(target_arch = "wasm32")]
        return self.save_to_local_storage();
    }

    /// Default config file path. Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("agrimap").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("agrimap")
                    .join(Self::default_filename())
            })
        }
    }

    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load_from_path(&path)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "agrimap-config";

    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let storage = local_storage().ok()?;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let storage = local_storage()?;
        let json = self.to_json()?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The browser's `localStorage`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn local_storage() -> Result<web_sys::Storage, ConfigError> {
    let window = web_sys::window()
        .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

    window
        .local_storage()
        .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
        .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// localStorage in WASM
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut config = DashboardConfig::new();
        config.preferences.default_color = ColorScheme::Purple;
        config.preferences.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        let back = DashboardConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_preferences_use_defaults() {
        let config = DashboardConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert_eq!(config.preferences, Preferences::default());

        let config =
            DashboardConfig::from_json(r#"{ "version": 1, "preferences": { "excludeDong": true } }"#)
                .unwrap();
        assert!(config.preferences.exclude_dong);
        assert_eq!(config.preferences.default_level_count, DEFAULT_LEVEL_COUNT);
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{ "version": {} }}"#, CONFIG_VERSION + 1);
        let err = DashboardConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::VersionTooNew { .. }));
    }

    #[test]
    fn test_visualization_setting_clamps_level_count() {
        let mut prefs = Preferences::default();
        prefs.default_level_count = 42;
        prefs.default_color = ColorScheme::Blue;

        let setting = prefs.visualization_setting();
        assert_eq!(setting.legend.level_count, MAX_LEVEL_COUNT);
        assert_eq!(setting.legend.color, ColorScheme::Blue);
    }

    #[test]
    fn test_endpoint_url() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.endpoint_url("/api/crops"), "/api/crops");

        prefs.api_base_url = "https://stats.example.org/".to_string();
        assert_eq!(prefs.endpoint_url("api/crops"), "https://stats.example.org/api/crops");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_and_load_path() {
        let dir = std::env::temp_dir().join(format!("agrimap-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join(DashboardConfig::default_filename());

        assert!(DashboardConfig::load_from_path(&path).is_none());

        let mut config = DashboardConfig::new();
        config.preferences.default_map_type = MapType::Satellite;
        config.save_to_path(&path).unwrap();

        assert_eq!(DashboardConfig::load_from_path(&path), Some(config));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
