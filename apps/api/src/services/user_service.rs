//! User service: registration, password reset, and password change.
//!
//! All plain passwords are hashed with argon2 before they reach the
//! repository; the database only ever sees hashes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use minierp_core::{User, UserStatus};
use minierp_db::Database;

/// Suffix appended to the employee number for reset passwords.
const RESET_SUFFIX: &str = "1234";

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub name: String,
    pub employee_number: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub name: String,
    pub employee_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub employee_number: String,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            name: u.name,
            employee_number: u.employee_number,
            status: u.status,
            last_login_at: u.last_login_at,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        UserService { db }
    }

    /// Registers a new user. The employee number must be unused.
    pub async fn add_user(&self, request: AddUserRequest) -> ApiResult<UserResponse> {
        if self
            .db
            .users()
            .exists_by_employee_number(&request.employee_number)
            .await?
        {
            return Err(ApiError::Conflict(
                "employee number already exists".to_string(),
            ));
        }

        let hash = hash_password(&request.password)?;
        let user = User::create(request.name, request.employee_number, hash)?;
        let saved = self.db.users().insert(&user).await?;

        Ok(saved.into())
    }

    /// Resets a forgotten password to `<employee number>1234`.
    ///
    /// Name and employee number must both match the stored record; a
    /// mismatch answers exactly like an unknown user.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ApiResult<()> {
        let user = self
            .db
            .users()
            .find_by_employee_number(&request.employee_number)
            .await?
            .ok_or_else(|| ApiError::not_found("user"))?;

        if user.name != request.name {
            return Err(ApiError::not_found("user"));
        }

        let reset = format!("{}{}", user.employee_number, RESET_SUFFIX);
        let hash = hash_password(&reset)?;
        self.db.users().update_password(user.id, &hash).await?;

        Ok(())
    }

    /// Changes a password after verifying the current one.
    pub async fn update_password(
        &self,
        user_id: i64,
        request: UpdatePasswordRequest,
    ) -> ApiResult<()> {
        let user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("user"))?;

        if !verify_password(&request.current_password, &user.password) {
            return Err(ApiError::BadRequest(
                "current password does not match".to_string(),
            ));
        }

        let hash = hash_password(&request.new_password)?;
        self.db.users().update_password(user.id, &hash).await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minierp_db::DbConfig;

    async fn service() -> UserService {
        UserService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    fn add_request(employee_number: &str) -> AddUserRequest {
        AddUserRequest {
            name: "Kim".into(),
            employee_number: employee_number.into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn test_add_user_hashes_password() {
        let svc = service().await;
        let created = svc.add_user(add_request("EMP-1024")).await.unwrap();

        let stored = svc
            .db
            .users()
            .get_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password, "hunter2");
        assert!(verify_password("hunter2", &stored.password));
    }

    #[tokio::test]
    async fn test_duplicate_employee_number_conflicts() {
        let svc = service().await;
        svc.add_user(add_request("EMP-1024")).await.unwrap();

        let err = svc.add_user(add_request("EMP-1024")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_reset_password() {
        let svc = service().await;
        let created = svc.add_user(add_request("EMP-1024")).await.unwrap();

        // Wrong name answers like an unknown user.
        let err = svc
            .reset_password(ResetPasswordRequest {
                name: "Lee".into(),
                employee_number: "EMP-1024".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        svc.reset_password(ResetPasswordRequest {
            name: "Kim".into(),
            employee_number: "EMP-1024".into(),
        })
        .await
        .unwrap();

        let stored = svc
            .db
            .users()
            .get_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("EMP-10241234", &stored.password));
    }

    #[tokio::test]
    async fn test_update_password_verifies_current() {
        let svc = service().await;
        let created = svc.add_user(add_request("EMP-1024")).await.unwrap();

        let err = svc
            .update_password(
                created.id,
                UpdatePasswordRequest {
                    current_password: "wrong".into(),
                    new_password: "new-pass".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        svc.update_password(
            created.id,
            UpdatePasswordRequest {
                current_password: "hunter2".into(),
                new_password: "new-pass".into(),
            },
        )
        .await
        .unwrap();

        let stored = svc
            .db
            .users()
            .get_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("new-pass", &stored.password));
    }
}
