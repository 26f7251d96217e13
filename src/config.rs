//! Layered settings.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config`)
//! 3. `NEXUS_*` environment variables, `__` between sections
//!    (e.g. `NEXUS_API__TIMEOUT_MS=3000`)
//! 4. `REACT_APP_API_BASE_URL` for the backend origin
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8094"
//! timeout_ms = 7000
//!
//! [simulator]
//! overview_tick_ms = 3000
//! consciousness_tick_ms = 2000
//!
//! [status]
//! poll_interval_secs = 30
//! stale_secs = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable that overrides the backend origin.
pub const API_BASE_URL_ENV: &str = "REACT_APP_API_BASE_URL";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Metric generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub overview_tick_ms: u64,
    pub consciousness_tick_ms: u64,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            overview_tick_ms: 3000,
            consciousness_tick_ms: 2000,
            seed: None,
        }
    }
}

/// Health polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusSettings {
    pub poll_interval_secs: u64,
    pub stale_secs: u64,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            stale_secs: 60,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// File to write logs to. The TUI owns the terminal, so logs are
    /// discarded when this is unset.
    pub file: Option<PathBuf>,
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// Redraw/input poll period.
    pub refresh_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { refresh_ms: 100 }
    }
}

/// All dashboard settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub simulator: SimulatorSettings,
    pub status: StatusSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

impl Settings {
    /// Load settings from every source, reading the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base_url = std::env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::load_with(path, base_url)
    }

    /// Load settings with an explicit backend origin override.
    pub fn load_with(path: Option<&Path>, base_url: Option<String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("NEXUS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", base_url)?
            .build()
            .context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("invalid configuration")
    }

    pub fn overview_interval(&self) -> Duration {
        Duration::from_millis(self.simulator.overview_tick_ms)
    }

    pub fn consciousness_interval(&self) -> Duration {
        Duration::from_millis(self.simulator.consciousness_tick_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.status.poll_interval_secs)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.status.stale_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.ui.refresh_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn defaults_match_dashboard() {
        let s = Settings::default();
        assert_eq!(s.api.base_url, "http://localhost:8094");
        assert_eq!(s.api.timeout(), Duration::from_millis(7000));
        assert_eq!(s.overview_interval(), Duration::from_secs(3));
        assert_eq!(s.consciousness_interval(), Duration::from_secs(2));
        assert_eq!(s.stale_after(), Duration::from_secs(60));
        assert!(s.logging.file.is_none());
    }

    #[test]
    fn load_without_sources_gives_defaults() {
        let s = Settings::load_with(None, None).unwrap();
        assert_eq!(s.api, ApiSettings::default());
        assert_eq!(s.simulator, SimulatorSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = toml_file();
        writeln!(
            file,
            "[api]\ntimeout_ms = 1500\n\n[simulator]\nseed = 42\n\n[status]\nstale_secs = 5"
        )
        .unwrap();

        let s = Settings::load_with(Some(file.path()), None).unwrap();
        assert_eq!(s.api.timeout_ms, 1500);
        assert_eq!(s.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.simulator.seed, Some(42));
        assert_eq!(s.status.stale_secs, 5);
        assert_eq!(s.status.poll_interval_secs, 30);
    }

    #[test]
    fn base_url_override_beats_file() {
        let mut file = toml_file();
        writeln!(file, "[api]\nbase_url = \"http://from-file:1\"").unwrap();

        let s =
            Settings::load_with(Some(file.path()), Some("http://from-env:2".to_string())).unwrap();
        assert_eq!(s.api.base_url, "http://from-env:2");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = Settings::load_with(Some(Path::new("/nonexistent/nexus.toml")), None);
        assert!(result.is_err());
    }
}
