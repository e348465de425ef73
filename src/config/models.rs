//! Host configuration data structures.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files and
//! to `COSMOSDB__*` environment overrides. Connection settings have no
//! defaults; logging and scheduling fall back to sensible values.
use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Dial timeout used when the configuration does not set one.
pub const DEFAULT_DIAL_TIMEOUT: &str = "60s";

fn default_dial_timeout() -> String {
    DEFAULT_DIAL_TIMEOUT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top level configuration file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub provider: CosmosDbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Connection settings for the document store.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CosmosDbConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
    pub collection_name: String,
    /// Parsed by humantime, e.g. "500ms", "10s", "1m"
    #[serde(default = "default_dial_timeout")]
    pub dial_timeout: String,
}

impl CosmosDbConfig {
    /// `host:port` as dialed.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dial_timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.dial_timeout)
    }

    /// Whether a username/password credential should be sent.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

impl fmt::Debug for CosmosDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosDbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
            .field("database", &self.database)
            .field("collection_name", &self.collection_name)
            .field("dial_timeout", &self.dial_timeout)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. "info" or "cosmosdb_provider=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Settings for the `watch` command, which re-runs the provider on an interval.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Parsed by humantime. Unset means a single cycle.
    pub refresh_interval: Option<String>,
}

impl ScheduleConfig {
    pub fn refresh_interval(&self) -> Result<Option<Duration>, humantime::DurationError> {
        self.refresh_interval
            .as_deref()
            .map(humantime::parse_duration)
            .transpose()
    }
}
