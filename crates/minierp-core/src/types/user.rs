//! User accounts.
//!
//! Users sign in with their employee number; passwords are stored as argon2
//! hashes (hashing happens in the API layer, this type only carries the
//! hash string).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::validation::{validate_employee_number, validate_name};

// =============================================================================
// User Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
}

// =============================================================================
// User
// =============================================================================

/// An application user, identified by a unique employee number.
///
/// Employee-number matching is case-sensitive everywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub name: String,
    pub employee_number: String,
    /// Argon2 password hash, never the plain password.
    #[serde(skip_serializing)]
    pub password: String,
    pub status: UserStatus,
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, unsaved ACTIVE user.
    ///
    /// `password_hash` must already be hashed; this factory never sees a
    /// plain password.
    pub fn create(
        name: impl Into<String>,
        employee_number: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> CoreResult<User> {
        let name = name.into();
        let employee_number = employee_number.into();

        validate_name("name", &name, 20)?;
        validate_employee_number(&employee_number)?;

        let now = Utc::now();
        Ok(User {
            id: 0,
            name,
            employee_number,
            password: password_hash.into(),
            status: UserStatus::Active,
            deleted_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the password hash.
    pub fn update_password(&mut self, new_password_hash: impl Into<String>) {
        self.password = new_password_hash.into();
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_active() {
        let user = User::create("Dana", "EMP-1024", "$argon2id$stub").unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.deleted_at.is_none());
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn test_create_validates_fields() {
        assert!(User::create("", "EMP-1024", "h").is_err());
        assert!(User::create("Dana", "", "h").is_err());
        assert!(User::create("Dana", "not valid!", "h").is_err());
    }

    #[test]
    fn test_update_password() {
        let mut user = User::create("Dana", "EMP-1024", "old-hash").unwrap();
        user.update_password("new-hash");
        assert_eq!(user.password, "new-hash");
    }
}
