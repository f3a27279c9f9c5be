//! # Stock Repository
//!
//! Database operations for stock balances.
//!
//! ## Transaction Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              Why the _tx methods take a connection                  │
//! │                                                                     │
//! │  A stock movement touches two tables atomically:                    │
//! │                                                                     │
//! │    BEGIN                                                            │
//! │      for each (item, warehouse) in StockKey order:                  │
//! │        UPDATE stocks ... / INSERT missing row                       │
//! │        INSERT INTO inventory_transactions ...                       │
//! │    COMMIT                                                           │
//! │                                                                     │
//! │  The service owns the transaction; repositories contribute the      │
//! │  statements. Processing keys in StockKey order keeps concurrent     │
//! │  multi-line movements from deadlocking each other.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::{PageRequest, Stock, StockKey};

const STOCK_COLUMNS: &str = "id, item_id, warehouse_id, qty, created_at, updated_at";

// =============================================================================
// View Row Types
// =============================================================================

/// Item header for the item-stock view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemInfoRecord {
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// One warehouse balance of an item.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemStockRecord {
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub qty: i64,
}

/// Warehouse header for the warehouse-stock view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WarehouseInfoRecord {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
}

/// One item balance held in a warehouse.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WarehouseStockRecord {
    pub item_id: i64,
    pub item_name: String,
    pub item_code: String,
    pub qty: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for stock balance operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Gets a balance row by its composite key.
    pub async fn get_by_key(&self, key: StockKey) -> DbResult<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE item_id = ?1 AND warehouse_id = ?2"
        ))
        .bind(key.item_id)
        .bind(key.warehouse_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stock)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Gets a balance row by key inside a caller-owned transaction.
    pub async fn find_by_key_tx(
        &self,
        conn: &mut SqliteConnection,
        key: StockKey,
    ) -> DbResult<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE item_id = ?1 AND warehouse_id = ?2"
        ))
        .bind(key.item_id)
        .bind(key.warehouse_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(stock)
    }

    /// Inserts a fresh balance row inside a caller-owned transaction.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - a concurrent movement created the row
    ///   first; callers retry and pick up the existing row
    pub async fn insert_tx(
        &self,
        conn: &mut SqliteConnection,
        stock: &Stock,
    ) -> DbResult<Stock> {
        debug!(
            item_id = stock.item_id,
            warehouse_id = stock.warehouse_id,
            "Creating stock row"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO stocks (item_id, warehouse_id, qty, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(stock.item_id)
        .bind(stock.warehouse_id)
        .bind(stock.qty)
        .bind(stock.created_at)
        .bind(stock.updated_at)
        .execute(&mut *conn)
        .await?;

        let mut saved = stock.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }

    /// Writes back the quantity computed by the domain inside a
    /// caller-owned transaction.
    pub async fn set_qty_tx(&self, conn: &mut SqliteConnection, stock: &Stock) -> DbResult<()> {
        let result = sqlx::query("UPDATE stocks SET qty = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(stock.id)
            .bind(stock.qty)
            .bind(stock.updated_at)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("stock", stock.id));
        }

        Ok(())
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Item header for the item-stock view.
    pub async fn get_item_info(&self, item_id: i64) -> DbResult<Option<ItemInfoRecord>> {
        let info = sqlx::query_as::<_, ItemInfoRecord>(
            "SELECT id, name, code FROM items WHERE id = ?1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(info)
    }

    /// Per-warehouse balances of one item, largest warehouse id first.
    pub async fn get_item_stock(
        &self,
        item_id: i64,
        page: PageRequest,
    ) -> DbResult<(Vec<ItemStockRecord>, i64)> {
        let rows = sqlx::query_as::<_, ItemStockRecord>(
            r#"
            SELECT s.warehouse_id, w.name AS warehouse_name, s.qty
            FROM stocks s
            JOIN warehouses w ON w.id = s.warehouse_id
            WHERE s.item_id = ?1
            ORDER BY s.warehouse_id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(item_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stocks WHERE item_id = ?1")
                .bind(item_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((rows, total))
    }

    /// Warehouse header for the warehouse-stock view.
    pub async fn get_warehouse_info(
        &self,
        warehouse_id: i64,
    ) -> DbResult<Option<WarehouseInfoRecord>> {
        let info = sqlx::query_as::<_, WarehouseInfoRecord>(
            "SELECT id, name, code FROM warehouses WHERE id = ?1",
        )
        .bind(warehouse_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(info)
    }

    /// Per-item balances held in one warehouse.
    pub async fn get_warehouse_stock(
        &self,
        warehouse_id: i64,
        page: PageRequest,
    ) -> DbResult<(Vec<WarehouseStockRecord>, i64)> {
        let rows = sqlx::query_as::<_, WarehouseStockRecord>(
            r#"
            SELECT s.item_id, i.name AS item_name, i.code AS item_code, s.qty
            FROM stocks s
            JOIN items i ON i.id = s.item_id
            WHERE s.warehouse_id = ?1
            ORDER BY s.item_id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(warehouse_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stocks WHERE warehouse_id = ?1")
                .bind(warehouse_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((rows, total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
