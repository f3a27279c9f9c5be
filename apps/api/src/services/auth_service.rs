//! Auth service: login by employee number, token refresh, current user.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{verify_password, JwtManager};
use crate::error::{ApiError, ApiResult};
use crate::services::user_service::UserResponse;
use minierp_core::UserStatus;
use minierp_db::Database;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub employee_number: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

// =============================================================================
// Service
// =============================================================================

pub struct AuthService {
    db: Database,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(db: Database, jwt: Arc<JwtManager>) -> Self {
        AuthService { db, jwt }
    }

    /// Authenticates by employee number and password.
    ///
    /// Unknown employee numbers, wrong passwords, and inactive accounts all
    /// answer with the same UNAUTHORIZED error; the response never reveals
    /// which part failed.
    pub async fn login(&self, request: LoginRequest) -> ApiResult<TokenResponse> {
        let invalid = || ApiError::Unauthorized("invalid credentials".to_string());

        let user = self
            .db
            .users()
            .find_by_employee_number(&request.employee_number)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password) {
            return Err(invalid());
        }

        if user.status != UserStatus::Active || user.deleted_at.is_some() {
            return Err(invalid());
        }

        self.db.users().touch_last_login(user.id, Utc::now()).await?;
        info!(user_id = user.id, "User logged in");

        self.issue_tokens(&user)
    }

    /// Issues a fresh token pair from a valid refresh token.
    pub async fn refresh(&self, request: RefreshRequest) -> ApiResult<TokenResponse> {
        let claims = self.jwt.validate_refresh_token(&request.refresh_token)?;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthorized("malformed subject claim".to_string()))?;

        let user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("unknown user".to_string()))?;

        if user.status != UserStatus::Active || user.deleted_at.is_some() {
            return Err(ApiError::Unauthorized("account disabled".to_string()));
        }

        self.issue_tokens(&user)
    }

    /// The authenticated caller's own record.
    pub async fn me(&self, user_id: i64) -> ApiResult<UserResponse> {
        let user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("user"))?;

        Ok(user.into())
    }

    fn issue_tokens(&self, user: &minierp_core::User) -> ApiResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: self.jwt.generate_access_token(user)?,
            refresh_token: self.jwt.generate_refresh_token(user)?,
            token_type: "Bearer",
            expires_in: self.jwt.access_lifetime_secs(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
