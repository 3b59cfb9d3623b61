//! Server configuration from environment variables (`.env` is loaded when present).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/resume";

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    /// Schema holding the resource tables; set as the pool's `search_path`.
    pub schema: String,
    pub port: u16,
    pub max_connections: u32,
    pub rate_limit_per_minute: u64,
    pub body_limit_bytes: usize,
    /// Create database, schema and tables at startup when missing.
    pub bootstrap_tables: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let schema = get("RESUME_SCHEMA").unwrap_or_else(|| "public".into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "RESUME_SCHEMA",
                reason: "must be a plain SQL identifier".into(),
            });
        }
        let rate_limit_per_minute = parse_or(&get, "RATE_LIMIT_PER_MINUTE", 100)?;
        if rate_limit_per_minute == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_PER_MINUTE",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(ServerConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            schema,
            port: parse_or(&get, "PORT", 3000)?,
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            rate_limit_per_minute,
            body_limit_bytes: parse_or(&get, "BODY_LIMIT_BYTES", 64 * 1024)?,
            bootstrap_tables: parse_bool(&get, "BOOTSTRAP_TABLES", true)?,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

fn parse_bool(get: &impl Fn(&str) -> Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match get(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
