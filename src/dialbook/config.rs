//! # Configuration
//!
//! The gateway location is a value handed to the client at construction,
//! never a constant baked into the code. That is what lets tests and the
//! demo mode point the same client at a mock endpoint.
//!
//! ## Resolution Order
//!
//! 1. `--base-url` on the command line
//! 2. `DIALBOOK_BASE_URL` environment variable
//! 3. `config.json` in the config directory (`DIALBOOK_CONFIG_DIR`, or the
//!    OS-appropriate directory from the `directories` crate)
//! 4. Compiled defaults
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `base-url` | `http://localhost:8080` | Root URL of the collection service |
//! | `countries-path` | `countries` | Path of the country collection |
//! | `prefixes-path` | `prefixes` | Path of the prefix collection |
//! | `request-timeout` | `10` | Seconds before a single request is abandoned |
//! | `connect-timeout` | `3` | Seconds allowed for establishing a connection |
//! | `submit-timeout` | `30` | Seconds an edit session may stay in `Submitting` |

use crate::error::{DialbookError, Result};
use crate::model::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const ENV_BASE_URL: &str = "DIALBOOK_BASE_URL";
pub const ENV_CONFIG_DIR: &str = "DIALBOOK_CONFIG_DIR";

pub const CONFIG_KEYS: [&str; 6] = [
    "base-url",
    "countries-path",
    "prefixes-path",
    "request-timeout",
    "connect-timeout",
    "submit-timeout",
];

/// Persisted client configuration, stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialbookConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_countries_path")]
    pub countries_path: String,

    #[serde(default = "default_prefixes_path")]
    pub prefixes_path: String,

    /// Seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Seconds
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_countries_path() -> String {
    ResourceKind::Countries.default_path().to_string()
}

fn default_prefixes_path() -> String {
    ResourceKind::Prefixes.default_path().to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    3
}

fn default_submit_timeout() -> u64 {
    30
}

impl Default for DialbookConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            countries_path: default_countries_path(),
            prefixes_path: default_prefixes_path(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            submit_timeout: default_submit_timeout(),
        }
    }
}

impl DialbookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DialbookConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Apply `DIALBOOK_BASE_URL` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-url" => Some(self.base_url.clone()),
            "countries-path" => Some(self.countries_path.clone()),
            "prefixes-path" => Some(self.prefixes_path.clone()),
            "request-timeout" => Some(self.request_timeout.to_string()),
            "connect-timeout" => Some(self.connect_timeout.to_string()),
            "submit-timeout" => Some(self.submit_timeout.to_string()),
            _ => None,
        }
    }

    /// Set a key from its string form. Returns a user-facing message on bad input.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "base-url" => {
                reqwest::Url::parse(value)
                    .map_err(|e| format!("Invalid base-url '{}': {}", value, e))?;
                self.base_url = value.to_string();
            }
            "countries-path" => self.countries_path = parse_path(key, value)?,
            "prefixes-path" => self.prefixes_path = parse_path(key, value)?,
            "request-timeout" => self.request_timeout = parse_seconds(key, value)?,
            "connect-timeout" => self.connect_timeout = parse_seconds(key, value)?,
            "submit-timeout" => self.submit_timeout = parse_seconds(key, value)?,
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            countries_path: self.countries_path.clone(),
            prefixes_path: self.prefixes_path.clone(),
            request_timeout: Duration::from_secs(self.request_timeout),
            connect_timeout: Duration::from_secs(self.connect_timeout),
        }
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout)
    }
}

fn parse_path(key: &str, value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", key));
    }
    Ok(trimmed.to_string())
}

fn parse_seconds(key: &str, value: &str) -> std::result::Result<u64, String> {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(format!(
            "{} must be a positive number of seconds, got '{}'",
            key, value
        )),
        Ok(n) => Ok(n),
    }
}

/// Everything the HTTP gateway needs to know about where the service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub countries_path: String,
    pub prefixes_path: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..DialbookConfig::default().gateway()
        }
    }

    pub fn path_for(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Countries => &self.countries_path,
            ResourceKind::Prefixes => &self.prefixes_path,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        DialbookConfig::default().gateway()
    }
}

/// Validates a user-supplied base URL before it reaches the gateway.
pub fn check_base_url(url: &str) -> Result<()> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|e| DialbookError::Config(format!("Invalid base URL '{}': {}", url, e)))
}
