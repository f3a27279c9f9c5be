//! Shared application state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use minierp_db::{Database, DbConfig};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub redis: Option<redis::Client>,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Assembles the full dependency graph from configuration: database
    /// (with migrations), optional redis client, JWT manager.
    ///
    /// Redis is best-effort: a bad or missing REDIS_URL logs a warning and
    /// the server runs without a cache client.
    pub async fn from_config(config: ApiConfig) -> anyhow::Result<AppState> {
        let db = Database::new(DbConfig::new(&config.database_path)).await?;
        info!("Connected to SQLite");

        let redis = match config.redis_url.as_deref() {
            Some(url) => match redis::Client::open(url) {
                Ok(client) => {
                    info!("Redis client configured");
                    Some(client)
                }
                Err(e) => {
                    warn!(?e, "Failed to configure Redis, continuing without it");
                    None
                }
            },
            None => None,
        };

        let jwt = JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        );

        Ok(AppState {
            db,
            redis,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        })
    }

    /// State for tests: in-memory database, no redis.
    pub async fn for_tests() -> anyhow::Result<AppState> {
        let config = ApiConfig::for_tests();

        let db = Database::new(DbConfig::in_memory()).await?;
        let jwt = JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        );

        Ok(AppState {
            db,
            redis: None,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        })
    }
}
