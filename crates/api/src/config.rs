//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_SECRET` - Token signing secret (min 32 chars, no placeholder text)
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 5000)
//! - `TOKEN_TTL_SECS` - Bearer token lifetime (default: 3600)
//! - `STORE_TIMEOUT_MS` - Per-query store deadline (default: 5000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` connection URL (contains password).
    pub database_url: SecretString,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Bearer token signing secret.
    pub jwt_secret: SecretString,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Deadline applied to every individual store call.
    pub store_timeout: Duration,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl ApiConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for missing or unparseable variables, or a
    /// signing secret that is too short or looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;

        let jwt_secret = require("JWT_SECRET")?;
        validate_secret("JWT_SECRET", &jwt_secret)?;

        let host = optional("API_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_owned(), e.to_string()))?;

        let port = optional("API_PORT")
            .unwrap_or_else(|| "5000".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_owned(), e.to_string()))?;

        let token_ttl_secs = optional("TOKEN_TTL_SECS")
            .unwrap_or_else(|| "3600".to_owned())
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TOKEN_TTL_SECS".to_owned(), e.to_string())
            })?;

        let store_timeout_ms = optional("STORE_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_owned())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_TIMEOUT_MS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_secs,
            store_timeout: Duration::from_millis(store_timeout_ms),
            sentry_dsn: optional("SENTRY_DSN"),
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Reject signing secrets that are too short or look like placeholders.
fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("must be at least {MIN_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("contains placeholder pattern \"{pattern}\""),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_length_enforced() {
        assert!(matches!(
            validate_secret("JWT_SECRET", "tiny"),
            Err(ConfigError::InsecureSecret(..))
        ));
    }

    #[test]
    fn test_placeholder_secrets_rejected() {
        let value = "your-signing-key-your-signing-key";
        assert!(matches!(
            validate_secret("JWT_SECRET", value),
            Err(ConfigError::InsecureSecret(..))
        ));
        let value = "changemechangemechangemechangeme!";
        assert!(matches!(
            validate_secret("JWT_SECRET", value),
            Err(ConfigError::InsecureSecret(..))
        ));
    }

    #[test]
    fn test_strong_secret_accepted() {
        let value = "kD93mfA27dLqX0vB5nRz8cJw1uHtG6yE";
        assert!(validate_secret("JWT_SECRET", value).is_ok());
    }
}
