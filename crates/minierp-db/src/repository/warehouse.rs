//! # Warehouse Repository
//!
//! Database operations for warehouse master data. Insert assigns the
//! `WH000001`-style business code from the row id, same pattern as
//! partners.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::{PageRequest, Warehouse, WarehouseStatus};

const WAREHOUSE_COLUMNS: &str =
    "id, name, code, location, status, created_at, updated_at";

/// Search filter for warehouse listings.
#[derive(Debug, Clone, Default)]
pub struct WarehouseSearch {
    /// Name prefix.
    pub name: Option<String>,
    /// Location prefix.
    pub location: Option<String>,
    pub status: Option<WarehouseStatus>,
}

/// Repository for warehouse database operations.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: SqlitePool,
}

impl WarehouseRepository {
    /// Creates a new WarehouseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WarehouseRepository { pool }
    }

    /// Inserts a new warehouse, assigns its business code, and returns the
    /// saved row.
    pub async fn insert(&self, warehouse: &Warehouse) -> DbResult<Warehouse> {
        debug!(name = %warehouse.name, "Inserting warehouse");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO warehouses (name, code, location, status, created_at, updated_at)
            VALUES (?1, NULL, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&warehouse.name)
        .bind(&warehouse.location)
        .bind(warehouse.status)
        .bind(warehouse.created_at)
        .bind(warehouse.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut saved = warehouse.clone();
        saved.id = result.last_insert_rowid();
        saved
            .generate_code()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query("UPDATE warehouses SET code = ?2 WHERE id = ?1")
            .bind(saved.id)
            .bind(&saved.code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Gets a warehouse by database id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Warehouse>> {
        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(warehouse)
    }

    /// Loads all warehouses with the given ids (order unspecified).
    pub async fn find_all_by_ids(&self, ids: &[i64]) -> DbResult<Vec<Warehouse>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql =
            format!("SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, Warehouse>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Searches warehouses by name/location prefix and status, newest first.
    pub async fn search(
        &self,
        filter: &WarehouseSearch,
        page: PageRequest,
    ) -> DbResult<(Vec<Warehouse>, i64)> {
        let rows = sqlx::query_as::<_, Warehouse>(&format!(
            r#"
            SELECT {WAREHOUSE_COLUMNS}
            FROM warehouses
            WHERE (?1 IS NULL OR name LIKE ?1 || '%')
              AND (?2 IS NULL OR location LIKE ?2 || '%')
              AND (?3 IS NULL OR status = ?3)
            ORDER BY id DESC
            LIMIT ?4 OFFSET ?5
            "#
        ))
        .bind(&filter.name)
        .bind(&filter.location)
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM warehouses
            WHERE (?1 IS NULL OR name LIKE ?1 || '%')
              AND (?2 IS NULL OR location LIKE ?2 || '%')
              AND (?3 IS NULL OR status = ?3)
            "#,
        )
        .bind(&filter.name)
        .bind(&filter.location)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Persists a status change (activate/deactivate).
    pub async fn update_status(&self, warehouse: &Warehouse) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE warehouses SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(warehouse.id)
        .bind(warehouse.status)
        .bind(warehouse.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("warehouse", warehouse.id));
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

    fn warehouse(name: &str, location: &str) -> Warehouse {
        Warehouse::create(name, location, WarehouseStatus::Active).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_code() {
        let db = test_db().await;
        let repo = db.warehouses();

        let saved = repo
            .insert(&warehouse("Central", "12 Dock Road"))
            .await
            .unwrap();

        assert_eq!(saved.code.as_deref(), Some("WH000001"));
        let reloaded = repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(reloaded.code.as_deref(), Some("WH000001"));
    }

    #[tokio::test]
    async fn test_search_by_status() {
        let db = test_db().await;
        let repo = db.warehouses();

        repo.insert(&warehouse("Central", "12 Dock Road"))
            .await
            .unwrap();
        let mut north = repo
            .insert(&warehouse("North Depot", "5 Quay Lane"))
            .await
            .unwrap();

        north.deactivate();
        repo.update_status(&north).await.unwrap();

        let (rows, total) = repo
            .search(
                &WarehouseSearch {
                    status: Some(WarehouseStatus::Active),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "Central");
    }
}
