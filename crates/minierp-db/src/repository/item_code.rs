//! # Item Code Sequence Repository
//!
//! Hands out values from the single-row `item_code_sequence` counter that
//! backs generated item codes.
//!
//! ## Concurrency
//! The fetch-and-increment is a single `UPDATE ... RETURNING` statement.
//! SQLite serializes writers, so two concurrent calls can never observe the
//! same counter value.

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use minierp_core::types::item_code;

/// Repository for the item code counter.
#[derive(Debug, Clone)]
pub struct ItemCodeRepository {
    pool: SqlitePool,
}

impl ItemCodeRepository {
    /// Creates a new ItemCodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemCodeRepository { pool }
    }

    /// Returns the next item code ("IC000001", "IC000002", ...) and
    /// advances the counter.
    pub async fn next_code(&self) -> DbResult<String> {
        let sequence: i64 = sqlx::query_scalar(
            r#"
            UPDATE item_code_sequence
            SET next_val = next_val + 1
            WHERE id = 1
            RETURNING next_val - 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("item_code_sequence", 1))?;

        Ok(item_code(sequence))
    }

    /// The value the next call to [`next_code`](Self::next_code) will use.
    /// Diagnostics only; do not build codes from this.
    pub async fn peek(&self) -> DbResult<i64> {
        let next: i64 =
            sqlx::query_scalar("SELECT next_val FROM item_code_sequence WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::not_found("item_code_sequence", 1))?;

        Ok(next)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_codes_are_sequential() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.item_codes();

        assert_eq!(repo.next_code().await.unwrap(), "IC000001");
        assert_eq!(repo.next_code().await.unwrap(), "IC000002");
        assert_eq!(repo.next_code().await.unwrap(), "IC000003");
        assert_eq!(repo.peek().await.unwrap(), 4);
    }
}
