//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Every section and every key is optional; missing ones take the defaults
//! below.

use crate::model::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/dev.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Upper bound on stops per route, one driver shift.
    pub max_stops_per_route: usize,
    pub kmeans_max_iterations: usize,
    /// Rebalance clusters so none exceeds `max_stops_per_route`.
    pub enforce_capacity: bool,
    /// Hour of day (UTC) used as the generation cutoff by the worker.
    pub cutoff_hour: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_stops_per_route: 20,
            kmeans_max_iterations: 50,
            enforce_capacity: true,
            cutoff_hour: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    Nominatim,
    Static,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub provider: GeocoderProvider,
    pub base_url: String,
    pub app_name: String,
    pub app_version: String,
    pub timeout_secs: u64,
    /// Minimum spacing between two provider calls
    pub min_interval_ms: u64,
    /// Address table used by the static provider
    #[serde(rename = "static")]
    pub static_table: HashMap<String, Coordinates>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::Nominatim,
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout_secs: 10,
            min_interval_ms: 1000,
            static_table: HashMap::new(),
        }
    }
}

impl GeocoderConfig {
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.app_name, self.app_version)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { channel_capacity: 64 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub routing: RoutingConfig,
    pub geocoder: GeocoderConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Resolve config path from CLI flag, environment, or default
    pub fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_path {
            return path.to_path_buf();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return PathBuf::from(path);
        }

        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the resolved path, falling back to defaults when the file
    /// is absent. A file that exists but does not parse is still an error.
    pub fn load(cli_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolve_config_path(cli_path);
        match Self::from_file(&path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routing.max_stops_per_route == 0 {
            return Err(ConfigError::Invalid(
                "routing.max_stops_per_route must be at least 1".to_string(),
            ));
        }
        if self.routing.cutoff_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "routing.cutoff_hour must be 0..=23, got {}",
                self.routing.cutoff_hour
            )));
        }
        if self.store.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "store.channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
