use chrono::Duration;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use thiserror::Error;

use crate::ephemeris::DEFAULT_VALIDITY;
use crate::predict::{Observer, PredictError, SearchConfig};
use crate::tle::DEFAULT_TLE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    #[serde(default)]
    pub tle: TleConfig,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TleConfig {
    #[serde(default = "default_tle_file")]
    pub file: PathBuf,
    #[serde(default = "default_satellite")]
    pub satellite: String,
    #[serde(default = "default_tle_url")]
    pub url: Option<String>,
    #[serde(default = "default_validity", deserialize_with = "deserialize_duration")]
    pub validity: Duration,
}

impl Default for TleConfig {
    fn default() -> Self {
        Self {
            file: default_tle_file(),
            satellite: default_satellite(),
            url: default_tle_url(),
            validity: default_validity(),
        }
    }
}

fn default_tle_file() -> PathBuf {
    PathBuf::from("iss.tle")
}

fn default_satellite() -> String {
    "ISS (ZARYA)".to_string()
}

fn default_tle_url() -> Option<String> {
    Some(DEFAULT_TLE_URL.to_string())
}

fn default_validity() -> Duration {
    DEFAULT_VALIDITY
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_min_elevation")]
    pub min_elevation: f64,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_step", deserialize_with = "deserialize_duration")]
    pub step: Duration,
    #[serde(default = "default_window", deserialize_with = "deserialize_duration")]
    pub window: Duration,
    #[serde(default = "default_max_span", deserialize_with = "deserialize_duration")]
    pub max_span: Duration,
    #[serde(default = "default_visibility")]
    pub visibility: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_elevation: default_min_elevation(),
            count: default_count(),
            step: default_step(),
            window: default_window(),
            max_span: default_max_span(),
            visibility: default_visibility(),
        }
    }
}

fn default_min_elevation() -> f64 {
    SearchConfig::default().min_elevation_deg
}

fn default_count() -> usize {
    SearchConfig::default().count
}

fn default_step() -> Duration {
    SearchConfig::default().step
}

fn default_window() -> Duration {
    SearchConfig::default().window
}

fn default_max_span() -> Duration {
    SearchConfig::default().max_span
}

fn default_visibility() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn observer(&self) -> Result<Observer, PredictError> {
        Observer::from_coordinates(&self.station.coordinates, Some(self.station.altitude_m))
    }

    pub fn station_name(&self) -> &str {
        self.station.name.as_deref().unwrap_or("station")
    }

    /// Search parameters from the file, with optional overrides from the
    /// command line or a query string. Validated.
    pub fn search_config(
        &self,
        count: Option<usize>,
        min_elevation: Option<f64>,
    ) -> Result<SearchConfig, PredictError> {
        let config = SearchConfig {
            min_elevation_deg: min_elevation.unwrap_or(self.search.min_elevation),
            count: count.unwrap_or(self.search.count),
            step: self.search.step,
            window: self.search.window,
            max_span: self.search.max_span,
            with_visibility: self.search.visibility,
        };
        config.validate()?;
        Ok(config)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim())
        .map_err(serde::de::Error::custom)
        .and_then(|d| Duration::from_std(d).map_err(serde::de::Error::custom))
}
