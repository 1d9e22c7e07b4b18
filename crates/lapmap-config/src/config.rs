//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "lapmap";
const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Map rasterization settings.
    pub render: RenderConfig,
    /// Field overlay settings.
    pub overlay: OverlayConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// Which rasterizer draws the tile map.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RasterBackend {
    /// Headless wgpu device with an offscreen render target.
    #[default]
    Gpu,
    /// CPU rasterization, no graphics device required.
    Software,
}

/// How encoded channel values outside 0..=255 are turned into bytes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelMode {
    /// Wrap modulo 256. Matches previously generated diagnostic images.
    #[default]
    Wrap,
    /// Saturate to 0..=255.
    Clamp,
}

/// Rasterization configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Rasterizer backend.
    pub backend: RasterBackend,
    /// Background color under empty cells.
    pub clear_color: [u8; 3],
}

/// Overlay compositing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Blend factor toward the encoded color (0.0 keeps the map, 1.0 replaces it).
    pub opacity: f32,
    /// Out-of-range channel handling.
    pub channel_mode: ChannelMode,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Filter string (e.g., "debug", "info,lapmap_render=trace").
    pub level: String,
    /// Also write JSON logs to the log directory.
    pub file_logging: bool,
}

// --- Default implementations ---

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: RasterBackend::Gpu,
            clear_color: [0, 0, 0],
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            opacity: 0.7,
            channel_mode: ChannelMode::Wrap,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// The platform configuration directory (`$XDG_CONFIG_HOME/lapmap` on Linux).
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("opacity: 0.7"));
        assert!(ron_str.contains("backend: Gpu"));
        assert!(ron_str.contains("channel_mode: Wrap"));
    }

    #[test]
    fn test_default_blend_is_legacy() {
        let overlay = OverlayConfig::default();
        assert_eq!(overlay.opacity, 0.7);
        assert_eq!(overlay.channel_mode, ChannelMode::Wrap);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(render: (backend: Software))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.render.backend, RasterBackend::Software);
        assert_eq!(config.render.clear_color, [0, 0, 0]);
        assert_eq!(config.overlay, OverlayConfig::default());
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.overlay.channel_mode = ChannelMode::Clamp;
        config.overlay.opacity = 0.5;
        config.render.clear_color = [10, 20, 30];

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// lapmap settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
