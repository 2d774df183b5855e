//! Application settings and paths.
//!
//! Settings live in an XDG-compliant JSON file. Nothing here is global:
//! `main` builds a [`Paths`] once and passes it to whatever needs it.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use crate::scanner::ScanOrder;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portcheck)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Does not create it.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portcheck", "portcheck")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Defaults applied when a flag is not given on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Host to scan.
    pub host: String,
    /// Comma-separated port list.
    pub ports: String,
    /// Per-port timeout, human-readable ("1s", "250ms").
    pub timeout: String,
    /// Maximum probes in flight, 0 for unbounded.
    pub concurrency: usize,
    /// Reporting order.
    pub order: ScanOrder,
    /// Output format.
    pub output: OutputFormat,
    /// Reject non-numeric or out-of-range ports before scanning.
    pub strict_ports: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            ports: "22,80".to_string(),
            timeout: "1s".to_string(),
            concurrency: 0,
            order: ScanOrder::Arrival,
            output: OutputFormat::Plain,
            strict_ports: false,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let file = paths.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// The configured timeout as a duration.
    pub fn timeout(&self) -> ConfigResult<Duration> {
        parse_timeout(&self.timeout)
    }
}

/// Parse a human-readable timeout such as `1s`, `500ms` or `1m 30s`.
pub fn parse_timeout(value: &str) -> ConfigResult<Duration> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidTimeout {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
