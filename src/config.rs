//! Resolver configuration at ~/.rsvp-geo/config.json.
//!
//! Layering: built-in defaults → config file → environment → CLI flags.
//! A missing file is fine; missing fields default individually.

use crate::geocode::display::MAP_ZOOM;
use crate::geocode::types::{GeoCoordinate, MissPolicy, DEFAULT_FALLBACK};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_USER_AGENT: &str = "RsvpGeo/0.3 (event-invitation-map)";
const DEFAULT_COUNTRY_CODE: &str = "br";
const DEFAULT_COUNTRY_NAME: &str = "Brasil";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_POSTAL_ENDPOINT: &str = "https://viacep.com.br/ws";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Nominatim-compatible search endpoint
    pub endpoint: String,
    /// Client label sent as User-Agent (required by the provider's usage policy)
    pub user_agent: String,
    /// ISO 3166-1 alpha-2 restriction passed as `countrycodes`
    pub country_code: String,
    /// Country name appended to every query
    pub country_name: String,
    /// ViaCEP-compatible base URL for postal code lookups
    pub postal_endpoint: String,
    pub fallback: GeoCoordinate,
    pub timeout_secs: u64,
    pub miss_policy: MissPolicy,
    pub zoom: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            country_name: DEFAULT_COUNTRY_NAME.to_string(),
            postal_endpoint: DEFAULT_POSTAL_ENDPOINT.to_string(),
            fallback: DEFAULT_FALLBACK,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            miss_policy: MissPolicy::default(),
            zoom: MAP_ZOOM,
        }
    }
}

impl ResolverConfig {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::load_from(&Self::default_path())?.with_env())
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read { path: path.to_path_buf(), source });
            }
        };
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rsvp-geo")
            .join("config.json")
    }

    pub fn with_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = var("RSVP_GEO_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(ua) = var("RSVP_GEO_USER_AGENT") {
            self.user_agent = ua;
        }
        if let Some(cc) = var("RSVP_GEO_COUNTRY") {
            self.country_code = cc.to_lowercase();
        }
        if let Some(postal) = var("RSVP_GEO_POSTAL_ENDPOINT") {
            self.postal_endpoint = postal;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
