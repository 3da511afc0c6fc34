//! Configuration for the ingestion batch.

use anyhow::Context;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Admission feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Path of the JSON export to ingest
    #[serde(default = "default_feed_path")]
    pub path: String,
    /// Admission category recorded on each roster row
    #[serde(default = "default_category")]
    pub category: String,
    /// Programme substring filter; empty keeps every row
    #[serde(default = "default_programme_filter")]
    pub programme_filter: String,
}

/// Path of the roster file shared with the other services.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_roster_path")]
    pub roster_path: String,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_feed_path() -> String {
    "/data/feed.json".to_string()
}

fn default_category() -> String {
    "fresher".to_string()
}

fn default_programme_filter() -> String {
    "computer engineering".to_string()
}

fn default_roster_path() -> String {
    "/data/roster.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: default_feed_path(),
            category: default_category(),
            programme_filter: default_programme_filter(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            roster_path: default_roster_path(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Uses `INGEST__` prefixed variables, e.g. `INGEST__FEED__PATH=/data/feed.json`.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("INGEST")
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(config)
    }
}
