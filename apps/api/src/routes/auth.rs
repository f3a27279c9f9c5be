//! Authentication routes: login, token refresh, current user.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::services::auth_service::{AuthService, LoginRequest, RefreshRequest, TokenResponse};
use crate::services::user_service::UserResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let tokens = AuthService::new(state.db.clone(), state.jwt.clone())
        .login(request)
        .await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let tokens = AuthService::new(state.db.clone(), state.jwt.clone())
        .refresh(request)
        .await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let me = AuthService::new(state.db.clone(), state.jwt.clone())
        .me(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(me)))
}
