//! # User Repository
//!
//! Database operations for user accounts.
//!
//! The employee number is the business identifier users sign in with;
//! lookups by it are exact and case-sensitive (BINARY collation, no
//! `COLLATE NOCASE` on the column).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::User;

const USER_COLUMNS: &str = "id, name, employee_number, password, status, \
     deleted_at, last_login_at, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user and returns it with the assigned id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - employee number already taken
    pub async fn insert(&self, user: &User) -> DbResult<User> {
        debug!(employee_number = %user.employee_number, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                name, employee_number, password, status,
                deleted_at, last_login_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&user.name)
        .bind(&user.employee_number)
        .bind(&user.password)
        .bind(user.status)
        .bind(user.deleted_at)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        let mut saved = user.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }

    /// Gets a user by database id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks a user up by employee number.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - a user with exactly this employee number exists
    /// * `Ok(None)` - no such user
    pub async fn find_by_employee_number(
        &self,
        employee_number: &str,
    ) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE employee_number = ?1"
        ))
        .bind(employee_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether a user with exactly this employee number exists.
    pub async fn exists_by_employee_number(&self, employee_number: &str) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE employee_number = ?1)",
        )
        .bind(employee_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Replaces the stored password hash.
    pub async fn update_password(&self, id: i64, password_hash: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET password = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }

        Ok(())
    }

    /// Records a successful login.
    pub async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = test_db().await;
        let repo = db.users();

        let a = repo
            .insert(&User::create("Kim", "EMP-0001", "hash-a").unwrap())
            .await
            .unwrap();
        let b = repo
            .insert(&User::create("Lee", "EMP-0002", "hash-b").unwrap())
            .await
            .unwrap();

        assert!(a.id > 0);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_find_by_employee_number() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert(&User::create("Kim", "EMP-1024", "hash").unwrap())
            .await
            .unwrap();

        let found = repo.find_by_employee_number("EMP-1024").await.unwrap();
        assert_eq!(found.unwrap().name, "Kim");

        // Never-saved employee numbers return an absent result.
        assert!(repo
            .find_by_employee_number("EMP-9999")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_exists_by_employee_number() {
        let db = test_db().await;
        let repo = db.users();

        assert!(!repo.exists_by_employee_number("EMP-1024").await.unwrap());

        repo.insert(&User::create("Kim", "EMP-1024", "hash").unwrap())
            .await
            .unwrap();

        assert!(repo.exists_by_employee_number("EMP-1024").await.unwrap());
    }

    #[tokio::test]
    async fn test_employee_number_matching_is_case_sensitive() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert(&User::create("Kim", "emp-1024", "hash").unwrap())
            .await
            .unwrap();

        assert!(repo.exists_by_employee_number("emp-1024").await.unwrap());
        assert!(!repo.exists_by_employee_number("EMP-1024").await.unwrap());
        assert!(repo
            .find_by_employee_number("EMP-1024")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_employee_number_rejected() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert(&User::create("Kim", "EMP-1024", "hash").unwrap())
            .await
            .unwrap();

        let err = repo
            .insert(&User::create("Lee", "EMP-1024", "hash").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_password() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .insert(&User::create("Kim", "EMP-1024", "old-hash").unwrap())
            .await
            .unwrap();

        repo.update_password(user.id, "new-hash").await.unwrap();

        let reloaded = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password, "new-hash");

        let err = repo.update_password(9999, "hash").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
