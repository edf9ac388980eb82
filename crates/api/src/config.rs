//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLIENTELE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   the generic `DATABASE_URL`)
//! - `CLIENTELE_JWT_SECRET` - HS256 signing secret (min 32 chars)
//!
//! ## Optional
//! - `CLIENTELE_HOST` - Bind address (default: 127.0.0.1)
//! - `CLIENTELE_PORT` - Listen port (default: 8000)
//! - `CLIENTELE_ACCESS_TOKEN_TTL_SECS` - Access token lifetime (default: 3600)
//! - `CLIENTELE_REFRESH_TOKEN_TTL_SECS` - Refresh token lifetime (default: 7200)
//! - `CLIENTELE_PAGE_SIZE` - Customers per list page (default: 10)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

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

/// Clientele API configuration.
#[derive(Debug, Clone)]
pub struct ClienteleConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// HS256 signing secret for access and refresh tokens
    pub jwt_secret: SecretString,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
    /// Number of customers per list page
    pub page_size: usize,
}

impl ClienteleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the JWT secret fails the length check.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CLIENTELE_DATABASE_URL")?;
        let host = get_env_or_default("CLIENTELE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CLIENTELE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CLIENTELE_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CLIENTELE_PORT".to_string(), e.to_string()))?;

        let jwt_secret = SecretString::from(get_required_env("CLIENTELE_JWT_SECRET")?);
        validate_jwt_secret(&jwt_secret, "CLIENTELE_JWT_SECRET")?;

        let access_token_ttl_secs = get_positive_i64("CLIENTELE_ACCESS_TOKEN_TTL_SECS", 3600)?;
        let refresh_token_ttl_secs = get_positive_i64("CLIENTELE_REFRESH_TOKEN_TTL_SECS", 7200)?;

        let page_size = get_env_or_default("CLIENTELE_PAGE_SIZE", "10")
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CLIENTELE_PAGE_SIZE".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            page_size,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional positive integer variable, falling back to a default.
fn get_positive_i64(key: &str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(key.to_string(), "must be a positive integer".to_string())
            }),
    }
}

/// Validate that the JWT signing secret meets minimum length requirements.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_jwt_secret_rejected() {
        let secret = SecretString::from("too-short");
        let err = validate_jwt_secret(&secret, "CLIENTELE_JWT_SECRET").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(..)));
    }

    #[test]
    fn test_long_jwt_secret_accepted() {
        let secret = SecretString::from("x".repeat(MIN_JWT_SECRET_LENGTH));
        assert!(validate_jwt_secret(&secret, "CLIENTELE_JWT_SECRET").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ClienteleConfig {
            database_url: SecretString::from("postgres://unused"),
            host: "0.0.0.0".parse().unwrap(),
            port: 8123,
            jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 7200,
            page_size: 10,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8123");
    }
}
