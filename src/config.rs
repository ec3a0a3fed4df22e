//! Runtime configuration from environment (after `.env` via dotenvy).

use crate::error::ConfigError;
use std::str::FromStr;

/// `app.db` next to the crate, independent of the working directory.
pub const DEFAULT_DB_URI: &str = concat!("sqlite://", env!("CARGO_MANIFEST_DIR"), "/app.db");
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5555";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// sqlx SQLite URL. From `DB_URI`; the file is created if missing.
    pub database_url: String,
    /// From `BIND_ADDR`.
    pub bind_addr: String,
    /// From `DB_MAX_CONNECTIONS`.
    pub max_connections: u32,
    /// Request body cap in bytes. From `BODY_LIMIT_BYTES`.
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DB_URI.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();
        Ok(AppConfig {
            database_url: get("DB_URI").unwrap_or(defaults.database_url),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), defaults.max_connections)?,
            body_limit: parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), defaults.body_limit)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}
