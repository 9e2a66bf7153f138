//! Startup configuration, read once from the environment.

use std::str::FromStr;

use thiserror::Error;

use crate::bus::EventBus;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_ENV: &str = "development";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the gateway needs before it can accept traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Listener port (`PORT`).
    pub port: u16,
    /// Deployment label (`NODE_ENV`, or `APP_ENV`). Informational only.
    pub env: String,
    /// Root of the REST services (`SERVICE_URL`), e.g. `http://localhost:9001/api`.
    pub service_url: String,
    /// Per-subscriber event buffer (`EVENT_BUS_CAPACITY`).
    pub event_bus_capacity: usize,
}

impl GatewayConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let service_url = lookup("SERVICE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("SERVICE_URL"))?;

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            env: lookup("NODE_ENV")
                .or_else(|| lookup("APP_ENV"))
                .unwrap_or_else(|| DEFAULT_ENV.to_string()),
            service_url: service_url.trim_end_matches('/').to_string(),
            event_bus_capacity: parse_or(&lookup, "EVENT_BUS_CAPACITY", EventBus::DEFAULT_CAPACITY)?,
        })
    }
}

fn parse_or<V>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: V) -> Result<V, ConfigError>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<V>();
            parsed.map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}
