//! Configuration management for userdb

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Maximum wait for a pooled connection
    pub acquire_timeout_secs: u64,
    /// Idle connections above `min_connections` are closed after this long
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 60,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Connection URL with the password masked, safe for logs
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match credentials.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => self.url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            service_name: "userdb".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Logging settings never fail to load, so they can be read before `Config`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = DatabaseConfig::new("");
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
                min_connections: parse_or("DATABASE_MIN_CONNECTIONS", defaults.min_connections),
                acquire_timeout_secs: parse_or(
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    defaults.acquire_timeout_secs,
                ),
                idle_timeout_secs: parse_or("DATABASE_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs),
            },
            telemetry: TelemetryConfig::from_env(),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
