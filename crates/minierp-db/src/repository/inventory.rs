//! # Inventory Transaction Repository
//!
//! Append and search operations for the stock movement journal. Journal
//! rows are written inside the same transaction as the balance updates
//! they describe, which is why the insert is a `_tx` method.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use minierp_core::{InventoryTransaction, PageRequest, TransactionType};

const ITX_COLUMNS: &str =
    "id, item_id, warehouse_id, type, qty_delta, ref_type, ref_id, reason, created_at";

/// Search filter for the journal. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct InventoryTransactionSearch {
    pub item_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub tx_type: Option<TransactionType>,
    /// Inclusive lower bound on created_at.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on created_at.
    pub to: Option<DateTime<Utc>>,
}

/// Repository for the inventory movement journal.
#[derive(Debug, Clone)]
pub struct InventoryTransactionRepository {
    pool: SqlitePool,
}

impl InventoryTransactionRepository {
    /// Creates a new InventoryTransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryTransactionRepository { pool }
    }

    /// Appends a journal row inside a caller-owned transaction.
    pub async fn insert_tx(
        &self,
        conn: &mut SqliteConnection,
        itx: &InventoryTransaction,
    ) -> DbResult<InventoryTransaction> {
        let result = sqlx::query(
            r#"
            INSERT INTO inventory_transactions (
                item_id, warehouse_id, type, qty_delta,
                ref_type, ref_id, reason, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(itx.item_id)
        .bind(itx.warehouse_id)
        .bind(itx.tx_type)
        .bind(itx.qty_delta)
        .bind(itx.ref_type)
        .bind(itx.ref_id)
        .bind(&itx.reason)
        .bind(itx.created_at)
        .execute(&mut *conn)
        .await?;

        let mut saved = itx.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }

    /// Searches the journal, newest first.
    pub async fn search(
        &self,
        filter: &InventoryTransactionSearch,
        page: PageRequest,
    ) -> DbResult<(Vec<InventoryTransaction>, i64)> {
        let rows = sqlx::query_as::<_, InventoryTransaction>(&format!(
            r#"
            SELECT {ITX_COLUMNS}
            FROM inventory_transactions
            WHERE (?1 IS NULL OR item_id = ?1)
              AND (?2 IS NULL OR warehouse_id = ?2)
              AND (?3 IS NULL OR type = ?3)
              AND (?4 IS NULL OR created_at >= ?4)
              AND (?5 IS NULL OR created_at < ?5)
            ORDER BY id DESC
            LIMIT ?6 OFFSET ?7
            "#
        ))
        .bind(filter.item_id)
        .bind(filter.warehouse_id)
        .bind(filter.tx_type)
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM inventory_transactions
            WHERE (?1 IS NULL OR item_id = ?1)
              AND (?2 IS NULL OR warehouse_id = ?2)
              AND (?3 IS NULL OR type = ?3)
              AND (?4 IS NULL OR created_at >= ?4)
              AND (?5 IS NULL OR created_at < ?5)
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.warehouse_id)
        .bind(filter.tx_type)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use minierp_core::{Item, ItemStatus, RefType, Warehouse, WarehouseStatus};

    async fn seed(db: &Database) -> (i64, i64) {
        let item = db
            .items()
            .insert(&Item::create("Bolt", "IC000001", 1500, ItemStatus::Active).unwrap())
            .await
            .unwrap();
        let warehouse = db
            .warehouses()
            .insert(&Warehouse::create("Central", "12 Dock Road", WarehouseStatus::Active).unwrap())
            .await
            .unwrap();
        (item.id, warehouse.id)
    }

    #[tokio::test]
    async fn test_insert_and_search() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (item_id, warehouse_id) = seed(&db).await;
        let repo = db.inventory_transactions();

        let mut tx = db.begin().await.unwrap();
        repo.insert_tx(
            &mut tx,
            &InventoryTransaction::purchase_inbound(item_id, warehouse_id, 10, 1).unwrap(),
        )
        .await
        .unwrap();
        repo.insert_tx(
            &mut tx,
            &InventoryTransaction::sales_outbound(item_id, warehouse_id, 4, 2).unwrap(),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let (rows, total) = repo
            .search(&InventoryTransactionSearch::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 2);
        // Newest first: the outbound row leads.
        assert_eq!(rows[0].qty_delta, -4);
        assert_eq!(rows[0].ref_type, Some(RefType::SalesOrder));

        let (rows, total) = repo
            .search(
                &InventoryTransactionSearch {
                    tx_type: Some(TransactionType::Inbound),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].qty_delta, 10);
    }
}
