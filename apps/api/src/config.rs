//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// Redis connection string (optional)
    pub redis_url: Option<String>,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// JWT refresh token lifetime in seconds
    pub jwt_refresh_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./erp.db".to_string()),

            redis_url: env::var("REDIS_URL").ok(),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "minierp-dev-secret-change-in-production".to_string()
            }),

            jwt_access_lifetime_secs: env::var("JWT_ACCESS_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()))?,

            jwt_refresh_lifetime_secs: env::var("JWT_REFRESH_LIFETIME_SECS")
                .unwrap_or_else(|_| "604800".to_string()) // 7 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_REFRESH_LIFETIME_SECS".to_string()))?,
        };

        if config.jwt_access_lifetime_secs <= 0 || config.jwt_refresh_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT lifetime".to_string()));
        }

        Ok(config)
    }

    /// Defaults for tests: in-memory-friendly, fixed secret.
    pub fn for_tests() -> Self {
        ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            redis_url: None,
            jwt_secret: "test-secret".to_string(),
            jwt_access_lifetime_secs: 3600,
            jwt_refresh_lifetime_secs: 86400,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // No env vars set in tests; defaults apply.
        let config = ApiConfig::for_tests();
        assert_eq!(config.jwt_access_lifetime_secs, 3600);
        assert!(config.redis_url.is_none());
    }
}
