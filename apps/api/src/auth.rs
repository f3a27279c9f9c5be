//! JWT authentication and password hashing.
//!
//! Handles token generation/validation, argon2 password hashing, and the
//! [`AuthUser`] extractor that guards protected routes.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use minierp_core::User;

// =============================================================================
// Claims
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Employee number the token was issued for
    pub employee_number: String,

    /// Display name
    pub name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// Token type ("access" or "refresh")
    pub token_type: String,
}

// =============================================================================
// JWT Manager
// =============================================================================

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
    refresh_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, access_lifetime_secs: i64, refresh_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            access_lifetime_secs,
            refresh_lifetime_secs,
        }
    }

    /// Access token lifetime, exposed for the login response.
    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_lifetime_secs
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        self.generate(user, "access", self.access_lifetime_secs)
    }

    /// Generate a refresh token for a user.
    pub fn generate_refresh_token(&self, user: &User) -> Result<String, ApiError> {
        self.generate(user, "refresh", self.refresh_lifetime_secs)
    }

    fn generate(
        &self,
        user: &User,
        token_type: &str,
        lifetime_secs: i64,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(lifetime_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            employee_number: user.employee_number.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("failed to generate token: {e}")))
    }

    /// Validate and decode a token of either type.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?;

        Ok(token_data.claims)
    }

    /// Validate that a token is an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != "access" {
            return Err(ApiError::Unauthorized("expected access token".to_string()));
        }

        Ok(claims)
    }

    /// Validate that a token is a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != "refresh" {
            return Err(ApiError::Unauthorized("expected refresh token".to_string()));
        }

        Ok(claims)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Request Guard
// =============================================================================

/// The authenticated caller, extracted from the bearer token.
///
/// Adding `AuthUser` as a handler argument makes the route require a valid
/// access token; without one the request is rejected with 401 before the
/// handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub employee_number: String,
    pub name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("expected bearer token".to_string()))?;

        let claims = state.jwt.validate_access_token(token)?;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthorized("malformed subject claim".to_string()))?;

        Ok(AuthUser {
            user_id,
            employee_number: claims.employee_number,
            name: claims.name,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minierp_core::fixtures::UserFixture;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret".to_string(), 3600, 86400)
    }

    #[test]
    fn test_jwt_roundtrip() {
        let user = UserFixture::create_with("Dana", "EMP-1024", "hash");
        let token = manager().generate_access_token(&user).unwrap();

        let claims = manager().validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.employee_number, "EMP-1024");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_wrong_token_type() {
        let user = UserFixture::create();
        let access = manager().generate_access_token(&user).unwrap();

        // An access token is not accepted where a refresh token is expected.
        assert!(manager().validate_refresh_token(&access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = UserFixture::create();
        let token = manager().generate_access_token(&user).unwrap();

        let other = JwtManager::new("other-secret".to_string(), 3600, 86400);
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
