//! # Purchase Order Repository
//!
//! Database operations for purchase orders and their lines. Header and
//! lines are separate tables; creating an order writes both in one
//! transaction.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::{PageRequest, PurchaseOrder, PurchaseOrderLine, PurchaseStatus};

const ORDER_COLUMNS: &str = "id, supplier_id, status, created_at, updated_at";
const LINE_COLUMNS: &str = "id, purchase_order_id, item_id, warehouse_id, qty, unit_cost_cents";

/// Search filter for purchase order listings.
#[derive(Debug, Clone, Default)]
pub struct PurchaseOrderSearch {
    pub supplier_id: Option<i64>,
    pub status: Option<PurchaseStatus>,
}

/// Repository for purchase order operations.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    pool: SqlitePool,
}

impl PurchaseOrderRepository {
    /// Creates a new PurchaseOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseOrderRepository { pool }
    }

    /// Inserts a header plus its initial lines in one transaction and
    /// returns the header with the assigned id.
    pub async fn create(
        &self,
        order: &PurchaseOrder,
        lines: &[PurchaseOrderLine],
    ) -> DbResult<PurchaseOrder> {
        debug!(supplier_id = order.supplier_id, lines = lines.len(), "Creating purchase order");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO purchase_orders (supplier_id, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order.supplier_id)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut saved = order.clone();
        saved.id = result.last_insert_rowid();

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO purchase_order_lines
                    (purchase_order_id, item_id, warehouse_id, qty, unit_cost_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(saved.id)
            .bind(line.item_id)
            .bind(line.warehouse_id)
            .bind(line.qty)
            .bind(line.unit_cost_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// Gets an order header by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<PurchaseOrder>> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Loads the lines of an order, in insertion order.
    pub async fn get_lines(&self, order_id: i64) -> DbResult<Vec<PurchaseOrderLine>> {
        let lines = sqlx::query_as::<_, PurchaseOrderLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM purchase_order_lines \
             WHERE purchase_order_id = ?1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Adds a line to an existing order.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - the (item, warehouse) pair already
    ///   has a line on this order
    pub async fn add_line(&self, line: &PurchaseOrderLine) -> DbResult<PurchaseOrderLine> {
        let result = sqlx::query(
            r#"
            INSERT INTO purchase_order_lines
                (purchase_order_id, item_id, warehouse_id, qty, unit_cost_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(line.purchase_order_id)
        .bind(line.item_id)
        .bind(line.warehouse_id)
        .bind(line.qty)
        .bind(line.unit_cost_cents)
        .execute(&self.pool)
        .await?;

        let mut saved = line.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }

    /// Removes a line from an order.
    pub async fn remove_line(&self, order_id: i64, line_id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "DELETE FROM purchase_order_lines WHERE id = ?1 AND purchase_order_id = ?2",
        )
        .bind(line_id)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("purchase order line", line_id));
        }

        Ok(())
    }

    /// Persists a status change.
    pub async fn update_status(&self, order: &PurchaseOrder) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE purchase_orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(order.id)
        .bind(order.status)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("purchase order", order.id));
        }

        Ok(())
    }

    /// Searches orders by supplier and status, newest first.
    pub async fn search(
        &self,
        filter: &PurchaseOrderSearch,
        page: PageRequest,
    ) -> DbResult<(Vec<PurchaseOrder>, i64)> {
        let rows = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM purchase_orders
            WHERE (?1 IS NULL OR supplier_id = ?1)
              AND (?2 IS NULL OR status = ?2)
            ORDER BY id DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(filter.supplier_id)
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM purchase_orders
            WHERE (?1 IS NULL OR supplier_id = ?1)
              AND (?2 IS NULL OR status = ?2)
            "#,
        )
        .bind(filter.supplier_id)
        .bind(filter.status)
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
    use minierp_core::{Item, ItemStatus, Partner, PartnerType, Warehouse, WarehouseStatus};

    async fn seed(db: &Database) -> (i64, i64, i64) {
        let supplier = db
            .partners()
            .insert(&Partner::create("Steel Works", PartnerType::Supplier, None, None).unwrap())
            .await
            .unwrap();
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
        (supplier.id, item.id, warehouse.id)
    }

    #[tokio::test]
    async fn test_create_with_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (supplier_id, item_id, warehouse_id) = seed(&db).await;
        let repo = db.purchase_orders();

        let line = PurchaseOrderLine::create(0, item_id, warehouse_id, 10, 1200).unwrap();
        let saved = repo
            .create(&PurchaseOrder::create(supplier_id), &[line])
            .await
            .unwrap();

        assert!(saved.id > 0);
        assert_eq!(saved.status, PurchaseStatus::Created);

        let lines = repo.get_lines(saved.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].purchase_order_id, saved.id);
        assert_eq!(lines[0].qty, 10);
    }

    #[tokio::test]
    async fn test_duplicate_line_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (supplier_id, item_id, warehouse_id) = seed(&db).await;
        let repo = db.purchase_orders();

        let saved = repo
            .create(&PurchaseOrder::create(supplier_id), &[])
            .await
            .unwrap();

        let line = PurchaseOrderLine::create(saved.id, item_id, warehouse_id, 10, 1200).unwrap();
        repo.add_line(&line).await.unwrap();

        let err = repo.add_line(&line).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_remove_line_and_status_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (supplier_id, item_id, warehouse_id) = seed(&db).await;
        let repo = db.purchase_orders();

        let mut saved = repo
            .create(
                &PurchaseOrder::create(supplier_id),
                &[PurchaseOrderLine::create(0, item_id, warehouse_id, 10, 1200).unwrap()],
            )
            .await
            .unwrap();

        let lines = repo.get_lines(saved.id).await.unwrap();
        repo.remove_line(saved.id, lines[0].id).await.unwrap();
        assert!(repo.get_lines(saved.id).await.unwrap().is_empty());

        assert!(matches!(
            repo.remove_line(saved.id, 9999).await.unwrap_err(),
            DbError::NotFound { .. }
        ));

        saved.mark_as_ordered(1).unwrap();
        repo.update_status(&saved).await.unwrap();
        let reloaded = repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, PurchaseStatus::Ordered);
    }
}
