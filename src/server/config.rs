use std::net::SocketAddr;

use url::Url;

use crate::server::error::config::ConfigError;

const DEFAULT_DATABASE_URL: &str = "sqlite://warden.db?mode=rwc";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_DASHBOARD_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATS_PUSH_INTERVAL_SECS: u64 = 5;
const DEFAULT_STATUS_ROTATION_SECS: u64 = 30;

/// Process configuration, loaded once at startup from the environment.
#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub default_prefix: String,

    /// User allowed to run owner-only commands. `None` denies them to everyone.
    pub owner_id: Option<u64>,
    /// Register slash commands to this guild only instead of globally.
    pub dev_guild_id: Option<u64>,
    pub log_webhook_url: Option<Url>,

    pub dashboard_token: String,
    pub dashboard_addr: SocketAddr,
    pub stats_push_interval_secs: u64,
    pub status_rotation_secs: u64,
}

impl Config {
    /// Loads configuration from process environment variables.
    ///
    /// `.env` should already have been applied with `dotenvy` before this runs.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and parseable
    /// - `Err(ConfigError)` - A required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` to resolve each variable.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let log_webhook_url = get("LOG_WEBHOOK_URL")
            .map(|value| {
                Url::parse(&value).map_err(|e| invalid("LOG_WEBHOOK_URL", &value, e.to_string()))
            })
            .transpose()?;

        let dashboard_addr = get("DASHBOARD_ADDR")
            .unwrap_or_else(|| DEFAULT_DASHBOARD_ADDR.to_string());
        let dashboard_addr = dashboard_addr
            .parse::<SocketAddr>()
            .map_err(|e| invalid("DASHBOARD_ADDR", &dashboard_addr, e.to_string()))?;

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            default_prefix: get("DEFAULT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            owner_id: parse_optional_u64("OWNER_ID", get("OWNER_ID"))?,
            dev_guild_id: parse_optional_u64("DEV_GUILD_ID", get("DEV_GUILD_ID"))?,
            log_webhook_url,
            dashboard_token: required("DASHBOARD_TOKEN")?,
            dashboard_addr,
            stats_push_interval_secs: parse_interval(
                "STATS_PUSH_INTERVAL_SECS",
                get("STATS_PUSH_INTERVAL_SECS"),
                DEFAULT_STATS_PUSH_INTERVAL_SECS,
            )?,
            status_rotation_secs: parse_interval(
                "STATUS_ROTATION_SECS",
                get("STATUS_ROTATION_SECS"),
                DEFAULT_STATUS_ROTATION_SECS,
            )?,
        })
    }
}

fn invalid(var: &str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        value: value.to_string(),
        reason,
    }
}

fn parse_optional_u64(var: &str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| invalid(var, &v, e.to_string()))
        })
        .transpose()
}

fn parse_interval(var: &str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match parse_optional_u64(var, value.clone())? {
        None => Ok(default),
        Some(0) => Err(invalid(
            var,
            value.as_deref().unwrap_or_default(),
            "interval must be at least 1 second".to_string(),
        )),
        Some(secs) => Ok(secs),
    }
}
