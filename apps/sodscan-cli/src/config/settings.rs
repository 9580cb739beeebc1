//! Persistent analysis settings
//!
//! Settings come from `config.json` in the config directory, then from
//! `SODSCAN_*` environment variables. Command-line flags are applied last by
//! the commands themselves.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sodscan_engine::DetectionStrategy;
use std::env::VarError;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::formats::OutputFormat;
use crate::output::parse_comma_list;

/// Number of users and roles listed in rankings by default
pub const DEFAULT_TOP_N: usize = 10;

/// Settings for an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory for report files; no files are written when unset
    pub output_dir: Option<PathBuf>,
    /// Presentation of results
    pub format: OutputFormat,
    /// Length of the top users and top roles rankings
    pub top_n: usize,
    /// Extra placeholders treated as empty cells, in addition to `NAN`
    pub missing_markers: Vec<String>,
    /// Pair enumeration strategy
    pub strategy: DetectionStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: OutputFormat::Table,
            top_n: DEFAULT_TOP_N,
            missing_markers: Vec::new(),
            strategy: DetectionStrategy::Auto,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_existing(path)
    }

    /// Load settings from a file the user named explicitly. A missing file
    /// is an error.
    pub fn load_existing(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings: Self = serde_json::from_str(&content).map_err(|e| {
            CliError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> CliResult<Self> {
        self.apply_env_from(|key| std::env::var(key))
    }

    /// Apply overrides from a custom variable reader.
    ///
    /// Recognized variables: `SODSCAN_OUTPUT_DIR`, `SODSCAN_FORMAT`,
    /// `SODSCAN_TOP_N`, `SODSCAN_STRATEGY`, `SODSCAN_MISSING_MARKERS`
    /// (comma separated).
    pub fn apply_env_from<F>(mut self, reader: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        if let Ok(dir) = reader("SODSCAN_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = Some(PathBuf::from(dir));
            }
        }

        if let Ok(format) = reader("SODSCAN_FORMAT") {
            self.format = OutputFormat::from_str(format.trim(), true)
                .map_err(|e| invalid_value("SODSCAN_FORMAT", &e))?;
        }

        if let Ok(top_n) = reader("SODSCAN_TOP_N") {
            self.top_n = top_n
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid_value("SODSCAN_TOP_N", &e.to_string()))?;
        }

        if let Ok(strategy) = reader("SODSCAN_STRATEGY") {
            self.strategy = strategy
                .parse::<DetectionStrategy>()
                .map_err(|e| invalid_value("SODSCAN_STRATEGY", &e))?;
        }

        if let Ok(markers) = reader("SODSCAN_MISSING_MARKERS") {
            self.missing_markers = parse_comma_list(&markers);
        }

        Ok(self)
    }
}

fn invalid_value(key: &str, message: &str) -> CliError {
    CliError::Config(format!("invalid value for {}: {}", key, message))
}
