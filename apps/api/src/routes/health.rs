//! Health endpoint (unauthenticated).

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
    pub cache_configured: bool,
}

/// Liveness plus a database ping.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<HealthStatus>>> {
    let database = state.db.health_check().await;

    if !database {
        return Err(ApiError::Internal("database unavailable".to_string()));
    }

    Ok(Json(ApiResponse::ok(HealthStatus {
        status: "ok",
        database,
        cache_configured: state.redis.is_some(),
    })))
}
