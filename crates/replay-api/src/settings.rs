//! Service settings
//!
//! Layered from an optional settings file (`replay.toml`, `replay.yaml`, ...)
//! and `REPLAY__`-prefixed environment variables, e.g.
//! `REPLAY__SERVER__BIND_ADDR=127.0.0.1:9000`.

use box_geometry::GeometryConfig;
use config::{Config, Environment, File};
use playback::PlaybackConfig;
use scenario_loader::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use track_engine::ClassifierConfig;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Source data locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Canonical trajectory table
    pub traj_file: PathBuf,
    /// Canonical map-feature table (may not exist)
    pub map_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            traj_file: PathBuf::from("data/trajectories.csv"),
            map_file: PathBuf::from("data/map_features.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    pub paths: PathSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub geometry: GeometryConfig,
    pub classifier: ClassifierConfig,
    pub cache: CacheConfig,
    pub playback: PlaybackConfig,
}

impl ReplaySettings {
    /// Load settings; `file` defaults to `replay` (any supported extension).
    ///
    /// A missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match file {
            Some(path) => File::from(path).required(false),
            None => File::with_name("replay").required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("REPLAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
