//! Platform-specific configuration paths

use crate::error::{CliError, CliResult};
use std::env::VarError;
use std::path::PathBuf;

/// Environment variable that replaces the platform config directory
pub const CONFIG_DIR_ENV: &str = "SODSCAN_CONFIG_DIR";

/// Configuration paths for the sodscan CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Path to config.json
    pub config_file: PathBuf,
}

impl ConfigPaths {
    /// Get configuration paths for the current platform
    ///
    /// Paths:
    /// - Linux: ~/.config/sodscan/
    /// - macOS: ~/Library/Application Support/sodscan/
    /// - Windows: %APPDATA%\sodscan\
    pub fn new() -> CliResult<Self> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Resolve paths using a custom variable reader.
    pub fn from_reader<F>(reader: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let config_dir = Self::get_config_dir(reader)?;
        Ok(Self::in_dir(config_dir))
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            config_file: config_dir.join("config.json"),
            config_dir,
        }
    }

    /// Get the configuration directory, respecting SODSCAN_CONFIG_DIR
    fn get_config_dir<F>(reader: F) -> CliResult<PathBuf>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        if let Ok(dir) = reader(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let base_dir = dirs::config_dir().ok_or_else(|| {
            CliError::Config("Could not determine configuration directory".to_string())
        })?;

        Ok(base_dir.join("sodscan"))
    }
}
