use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_STATION_RADIUS_M: u32 = 5000;
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub model: Option<ModelSection>,
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub google: Option<GoogleSection>,
    #[serde(default)]
    pub elevation: Option<ElevationSection>,
    #[serde(default)]
    pub stations: Option<StationsSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleSection {
    /// Overridden by the GOOGLE_API_KEY environment variable when set.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ElevationSection {
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationsSection {
    /// Charging station search radius in meters (default: 5000)
    pub radius_m: Option<u32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no Google API key configured ([google].api_key or GOOGLE_API_KEY)")]
    MissingApiKey,
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

impl Config {
    pub fn model_path(&self) -> Option<&Path> {
        let path = self.model.as_ref()?.path.as_deref()?;
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Environment variable first, config file second.
    pub fn google_api_key(&self) -> Result<String, ConfigError> {
        if let Ok(key) = std::env::var(GOOGLE_API_KEY_ENV)
            && !key.is_empty()
        {
            return Ok(key);
        }
        self.google
            .as_ref()
            .and_then(|g| g.api_key.clone())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn google_base_url(&self) -> String {
        self.google
            .as_ref()
            .and_then(|g| g.base_url.clone())
            .unwrap_or_else(|| crate::trip::google::DEFAULT_BASE_URL.to_string())
    }

    pub fn elevation_base_url(&self) -> String {
        self.elevation
            .as_ref()
            .and_then(|e| e.base_url.clone())
            .unwrap_or_else(|| crate::trip::elevation::DEFAULT_BASE_URL.to_string())
    }

    /// Returns the station search radius in meters (default: 5000)
    pub fn station_radius_m(&self) -> u32 {
        self.stations
            .as_ref()
            .and_then(|s| s.radius_m)
            .unwrap_or(DEFAULT_STATION_RADIUS_M)
    }
}
