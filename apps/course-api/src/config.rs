//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid, or the
//! application exits with a clear error message before binding a socket.

use courseway_api::RateLimitConfig;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host. `COURSE_API_HOST`, default `0.0.0.0`.
    pub host: String,
    /// Bind port. `COURSE_API_PORT`, default `3000`.
    pub port: u16,
    /// Secret used to sign and verify credentials. `JWT_SECRET`, required.
    pub jwt_secret: String,
    /// Credential lifetime in seconds. `TOKEN_TTL_SECS`, default 86400 (24h).
    pub token_ttl_secs: i64,
    /// Token-bucket settings. `RATE_LIMIT_CAPACITY` (default 3),
    /// `RATE_LIMIT_REFILL_PER_MS` (default 0.0003),
    /// `RATE_LIMIT_MAX_CLIENTS` (default 10000).
    pub rate_limit: RateLimitConfig,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub rust_log: String,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_secs: i64 = parse_or("TOKEN_TTL_SECS", 86_400)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "TOKEN_TTL_SECS",
                message: "must be positive".to_string(),
            });
        }

        let capacity: f64 = parse_or("RATE_LIMIT_CAPACITY", 3.0)?;
        if capacity < 1.0 {
            return Err(ConfigError::Invalid {
                var: "RATE_LIMIT_CAPACITY",
                message: "must be at least 1".to_string(),
            });
        }

        let refill_per_ms: f64 = parse_or("RATE_LIMIT_REFILL_PER_MS", 0.0003)?;
        if refill_per_ms < 0.0 {
            return Err(ConfigError::Invalid {
                var: "RATE_LIMIT_REFILL_PER_MS",
                message: "must not be negative".to_string(),
            });
        }

        Ok(Self {
            host: env_or("COURSE_API_HOST", "0.0.0.0"),
            port: parse_or("COURSE_API_PORT", 3000)?,
            jwt_secret,
            token_ttl_secs,
            rate_limit: RateLimitConfig {
                capacity,
                refill_per_ms,
                max_clients: parse_or("RATE_LIMIT_MAX_CLIENTS", 10_000)?,
            },
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(var) {
        Ok(raw) if !raw.is_empty() => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
        _ => Ok(default),
    }
}
