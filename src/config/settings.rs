//! Application settings and paths.
//!
//! Settings live in an XDG-compliant JSON file; a missing file means
//! built-in defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::neighbor::DEFAULT_NEIGHBOR_TIMEOUT;
use crate::probe::{DEFAULT_PROBE_TIMEOUT, DEFAULT_WORKERS};
use crate::types::DEFAULT_MAX_HOSTS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory
/// Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/lansweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform's configuration directory.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "lansweep", "lansweep").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-probe timeout in seconds.
    pub probe_timeout_secs: f64,
    /// Probes in flight at once.
    pub workers: usize,
    /// Largest CIDR expansion accepted.
    pub max_hosts: usize,
    /// Per-command timeout for neighbor-table dumps, in seconds.
    pub neighbor_timeout_secs: f64,
    /// Probes per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Print identifiers unmasked by default.
    pub reveal: bool,
    /// Default output format.
    pub output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs_f64(),
            workers: DEFAULT_WORKERS,
            max_hosts: DEFAULT_MAX_HOSTS,
            neighbor_timeout_secs: DEFAULT_NEIGHBOR_TIMEOUT.as_secs_f64(),
            rate_limit: 0,
            reveal: false,
            output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
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

        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;

        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        if self.max_hosts == 0 {
            return Err(ConfigError::Invalid("max_hosts must be at least 1".to_string()));
        }
        parse_seconds(self.probe_timeout_secs)
            .map_err(|e| ConfigError::Invalid(format!("probe_timeout_secs: {}", e)))?;
        parse_seconds(self.neighbor_timeout_secs)
            .map_err(|e| ConfigError::Invalid(format!("neighbor_timeout_secs: {}", e)))?;
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.probe_timeout_secs)
    }

    pub fn neighbor_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.neighbor_timeout_secs)
    }
}

/// Convert a positive, finite number of seconds to a `Duration`.
pub fn parse_seconds(secs: f64) -> Result<Duration, String> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("expected a positive number of seconds, got {}", secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
