//! Service configuration.
//!
//! Loaded from environment variables (a `.env` file is honored) and validated
//! at startup. The signing secret has no default: every deployment must
//! supply its own.

use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid port number
    #[error("Invalid port: must be between 1 and 65535")]
    InvalidPort,

    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Environment variable parse error
    #[error("Failed to parse environment variable {name}: {reason}")]
    ParseError {
        /// Variable name
        name: String,
        /// Parser message
        reason: String,
    },
}

/// Service configuration with validation.
#[derive(Debug)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port (1-65535)
    pub port: u16,
    /// Symmetric secret tokens are signed and verified with
    pub signing_secret: SecretString,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    /// Loads configuration from environment variables with validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|name| env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingRequired("JWT_SECRET".to_string()))?;

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "PORT", 6000)?,
            signing_secret,
            shutdown_timeout: Duration::from_secs(parse_var(&lookup, "SHUTDOWN_TIMEOUT", 30)?),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: parse_var(&lookup, "LOG_JSON", true)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.signing_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }
        Ok(())
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a variable with a default value.
fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(val) => val.parse().map_err(|e: T::Err| ConfigError::ParseError {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
