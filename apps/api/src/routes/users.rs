//! User management routes.

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::services::user_service::{
    AddUserRequest, ResetPasswordRequest, UpdatePasswordRequest, UserResponse, UserService,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_user))
        // Reset is for people who cannot log in; no token required.
        .route("/reset-password", post(reset_password))
        .route("/:id/password", patch(update_password))
}

async fn add_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AddUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let created = UserService::new(state.db.clone()).add_user(request).await?;
    Ok(Json(ApiResponse::ok(created)))
}

async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    UserService::new(state.db.clone())
        .reset_password(request)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn update_password(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    _user: AuthUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    UserService::new(state.db.clone())
        .update_password(user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}
