//! Application configuration loaded from environment variables.

use admission_store::NumberPlan;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// WhatsApp bridge configuration
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Table storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Numbering plan for phone canonicalization
    #[serde(default)]
    pub phone: NumberPlan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// WhatsApp bridge REST API endpoint
    #[serde(default = "default_bridge_url")]
    pub base_url: String,

    /// HTTP request timeout towards the bridge
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Monitored group names, comma-separated
    #[serde(default = "default_groups")]
    pub groups: String,

    /// Wait between reconciliation cycles
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Safety cap on approval attempts per group per cycle
    #[serde(default = "default_max_approvals")]
    pub max_approvals_per_cycle: usize,

    /// Bound on each external action within a cycle
    #[serde(default = "default_action_timeout", with = "humantime_serde")]
    pub action_timeout: Duration,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the whitelist table
    #[serde(default = "default_whitelist_path")]
    pub whitelist_path: PathBuf,

    /// Path to the approval ledger table
    #[serde(default = "default_approvals_path")]
    pub approvals_path: PathBuf,
}

// Default implementations
impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            poll_interval: default_poll_interval(),
            max_approvals_per_cycle: default_max_approvals(),
            action_timeout: default_action_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            whitelist_path: default_whitelist_path(),
            approvals_path: default_approvals_path(),
        }
    }
}

// Default value functions
fn default_bridge_url() -> String {
    "http://whatsapp-bridge:8090".into()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_groups() -> String {
    "COE 1 {Official},COE 1 {Unofficial}".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_max_approvals() -> usize {
    10
}

fn default_action_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_whitelist_path() -> PathBuf {
    PathBuf::from("/data/whitelist.json")
}

fn default_approvals_path() -> PathBuf {
    PathBuf::from("/data/approvals.json")
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Group names and phone prefixes must stay strings
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Monitored groups as a list, in configured order.
    pub fn group_list(&self) -> Vec<String> {
        self.bot
            .groups
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_list_splits_and_trims() {
        let mut config = Config {
            bridge: BridgeConfig::default(),
            bot: BotConfig::default(),
            storage: StorageConfig::default(),
            phone: NumberPlan::default(),
        };
        config.bot.groups = "COE 1 {Official}, COE 1 {Unofficial} ,".into();

        assert_eq!(
            config.group_list(),
            vec!["COE 1 {Official}", "COE 1 {Unofficial}"]
        );
    }

    #[test]
    fn test_default_groups() {
        let bot = BotConfig::default();
        assert!(bot.groups.contains("Official"));
        assert_eq!(bot.max_approvals_per_cycle, 10);
        assert_eq!(bot.poll_interval, Duration::from_secs(60));
    }
}
