//! Application configuration loaded from environment.

use chrono::Duration;
use std::net::SocketAddr;

/// Minimum accepted length of the HS256 signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Upper bound for `ACCESS_TOKEN_TTL_MINUTES` (one week).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret (min 32 bytes).
    pub jwt_secret: String,
    /// Lifetime of issued access tokens.
    pub access_token_ttl: Duration,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. `JWT_SECRET` and `DATABASE_URL`
    /// have no defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigLoadError> {
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigLoadError::MissingDatabaseUrl)?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigLoadError::MissingJwtSecret)?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigLoadError::WeakJwtSecret);
        }

        let ttl_minutes = match lookup("ACCESS_TOKEN_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|m| (1..=MAX_TOKEN_TTL_MINUTES).contains(m))
                .ok_or(ConfigLoadError::InvalidTokenTtl)?,
            None => 30,
        };
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            database_url,
            jwt_secret,
            access_token_ttl: Duration::minutes(ttl_minutes),
            log_level,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("JWT_SECRET is not set")]
    MissingJwtSecret,
    #[error("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_LEN)]
    WeakJwtSecret,
    #[error("ACCESS_TOKEN_TTL_MINUTES must be between 1 and {}", MAX_TOKEN_TTL_MINUTES)]
    InvalidTokenTtl,
}
