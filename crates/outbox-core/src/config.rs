use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// How often the scheduler polls for due jobs, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Top-level config (outbox.toml + OUTBOX_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutboxConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Fixed poll interval. Read once at startup; not reconfigurable while
    /// the worker is running.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl OutboxConfig {
    /// Load config: explicit path > OUTBOX_CONFIG env > ~/.outbox/outbox.toml.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        // `__` separates nesting levels; a single `_` stays inside the key,
        // so OUTBOX_SCHEDULER__POLL_INTERVAL_SECS reaches
        // scheduler.poll_interval_secs.
        let config: OutboxConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("OUTBOX_").split("__"))
            .extract()
            .map_err(|e| crate::error::OutboxError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.outbox/outbox.toml", home)
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.outbox/outbox.db", home)
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
