//! # Configuration Management Module
//!
//! Centralized configuration for the play engine with validation, defaults,
//! and TOML persistence.
//!
//! ## Configuration Structure
//!
//! - [`BackendConfig`] - quest backend base URL and request timeout
//! - [`GeoConfig`] - geolocation timeout/retry tunables and the fallback
//!   coordinate
//! - [`PlayConfig`] - proximity threshold
//! - [`LoggingConfig`] - log level and optional file target
//!
//! ## Usage
//!
//! ```rust,no_run
//! use geoquest::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Backend: {}", config.backend.base_url);
//!     Ok(())
//! }
//! ```
//!
//! The defaults reproduce the constants the original deployment shipped
//! with: a 50 m proximity gate, a 20 s position read timeout with five
//! attempts 3 s apart, and a Gwangju city-center fallback coordinate.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub play: PlayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the quest REST backend, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u64,
}

fn default_backend_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Timeout for a single position read, seconds.
    pub acquire_timeout_seconds: u64,
    /// Delay between failed reads, seconds.
    pub retry_delay_seconds: u64,
    /// Total position reads per acquisition before falling back.
    pub retry_budget: u32,
    /// Fallback coordinate substituted when live geolocation cannot be
    /// obtained.
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            acquire_timeout_seconds: 20,
            retry_delay_seconds: 3,
            retry_budget: 5,
            fallback_latitude: 35.1595454,
            fallback_longitude: 126.8526012,
        }
    }
}

impl GeoConfig {
    pub fn fallback_coordinate(&self) -> Coordinate {
        // Range-checked by Config::validate at load time.
        Coordinate {
            latitude: self.fallback_latitude,
            longitude: self.fallback_longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Interaction gate radius in meters. Boundary inclusive.
    pub proximity_threshold_m: f64,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_m: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file path; empty string logs to stderr.
    #[serde(default)]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(anyhow!("backend.base_url must not be empty"));
        }
        if self.backend.timeout_seconds == 0 {
            return Err(anyhow!("backend.timeout_seconds must be at least 1"));
        }
        if self.geo.acquire_timeout_seconds == 0 {
            return Err(anyhow!("geo.acquire_timeout_seconds must be at least 1"));
        }
        if self.geo.retry_budget == 0 {
            return Err(anyhow!("geo.retry_budget must be at least 1"));
        }
        if !self.geo.fallback_coordinate().is_valid() {
            return Err(anyhow!(
                "geo fallback coordinate ({}, {}) is out of range",
                self.geo.fallback_latitude,
                self.geo.fallback_longitude
            ));
        }
        if !(self.play.proximity_threshold_m.is_finite() && self.play.proximity_threshold_m > 0.0) {
            return Err(anyhow!("play.proximity_threshold_m must be positive"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_seconds: default_backend_timeout(),
            },
            geo: GeoConfig::default(),
            play: PlayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
