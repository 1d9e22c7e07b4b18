//! Platform directory resolution.
//!
//! Finds where the config file and log file live, following OS conventions
//! (XDG on Linux, Known Folders on Windows, Library on macOS).

use std::path::{Path, PathBuf};

use lapmap_config::{Config, ConfigError};

const APP_NAME: &str = "lapmap";

/// OS-specific directory paths for lapmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds the JSON log file when file logging is enabled.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve directories without creating them.
    ///
    /// `config_override` replaces the platform config directory (`--config`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no override is given and the OS
    /// does not expose a configuration directory.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, ConfigError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => Config::default_dir()?,
        };
        let log_dir = dirs::cache_dir()
            .map(|base| base.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| config_dir.join("logs"));

        Ok(Self {
            config_dir,
            log_dir,
        })
    }
}
