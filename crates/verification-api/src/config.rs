//! Configuration for the verification API.

use admission_store::NumberPlan;
use anyhow::Context;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub groups: GroupsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub phone: NumberPlan,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Paths of the JSON files shared with the approval bot.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_roster_path")]
    pub roster_path: String,
    #[serde(default = "default_whitelist_path")]
    pub whitelist_path: String,
}

/// Invite links returned to applicants after registration.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsConfig {
    #[serde(default = "default_official_link")]
    pub official_link: String,
    #[serde(default = "default_unofficial_link")]
    pub unofficial_link: String,
}

/// Rate limiting settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_global_per_minute")]
    pub global_per_minute: u32,
    #[serde(default = "default_per_applicant_per_minute")]
    pub per_applicant_per_minute: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_roster_path() -> String {
    "/data/roster.json".to_string()
}

fn default_whitelist_path() -> String {
    "/data/whitelist.json".to_string()
}

fn default_official_link() -> String {
    "https://chat.whatsapp.com/replace-with-official-invite".to_string()
}

fn default_unofficial_link() -> String {
    "https://chat.whatsapp.com/replace-with-unofficial-invite".to_string()
}

fn default_global_per_minute() -> u32 {
    30
}

fn default_per_applicant_per_minute() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            roster_path: default_roster_path(),
            whitelist_path: default_whitelist_path(),
        }
    }
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            official_link: default_official_link(),
            unofficial_link: default_unofficial_link(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_per_minute(),
            per_applicant_per_minute: default_per_applicant_per_minute(),
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
    /// Uses `VERIFY__` prefixed variables, e.g. `VERIFY__SERVER__PORT=8082`.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("VERIFY")
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

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.listen_addr, self.server.port)
    }
}
