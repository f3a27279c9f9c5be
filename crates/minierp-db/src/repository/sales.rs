//! # Sales Order Repository
//!
//! Database operations for sales orders and their lines. The header row
//! carries the embedded customer-contact and shipping-address snapshots.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::{PageRequest, SalesOrder, SalesOrderLine, SalesStatus};

const ORDER_COLUMNS: &str = "id, customer_id, status, customer_name, customer_phone, \
     zipcode, address1, address2, created_at, updated_at";
const LINE_COLUMNS: &str = "id, sales_order_id, item_id, warehouse_id, qty, unit_price_cents";

/// Search filter for sales order listings.
#[derive(Debug, Clone, Default)]
pub struct SalesOrderSearch {
    pub customer_id: Option<i64>,
    pub status: Option<SalesStatus>,
}

/// Repository for sales order operations.
#[derive(Debug, Clone)]
pub struct SalesOrderRepository {
    pool: SqlitePool,
}

impl SalesOrderRepository {
    /// Creates a new SalesOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesOrderRepository { pool }
    }

    /// Inserts a header plus its initial lines in one transaction and
    /// returns the header with the assigned id.
    pub async fn create(
        &self,
        order: &SalesOrder,
        lines: &[SalesOrderLine],
    ) -> DbResult<SalesOrder> {
        debug!(customer_id = order.customer_id, lines = lines.len(), "Creating sales order");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales_orders (
                customer_id, status, customer_name, customer_phone,
                zipcode, address1, address2, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(order.customer_id)
        .bind(order.status)
        .bind(&order.customer_info.customer_name)
        .bind(&order.customer_info.customer_phone)
        .bind(&order.shipping_address.zipcode)
        .bind(&order.shipping_address.address1)
        .bind(&order.shipping_address.address2)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut saved = order.clone();
        saved.id = result.last_insert_rowid();

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO sales_order_lines
                    (sales_order_id, item_id, warehouse_id, qty, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(saved.id)
            .bind(line.item_id)
            .bind(line.warehouse_id)
            .bind(line.qty)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// Gets an order header by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SalesOrder>> {
        let order = sqlx::query_as::<_, SalesOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sales_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Loads the lines of an order, in insertion order.
    pub async fn get_lines(&self, order_id: i64) -> DbResult<Vec<SalesOrderLine>> {
        let lines = sqlx::query_as::<_, SalesOrderLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM sales_order_lines \
             WHERE sales_order_id = ?1 ORDER BY id"
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
    pub async fn add_line(&self, line: &SalesOrderLine) -> DbResult<SalesOrderLine> {
        let result = sqlx::query(
            r#"
            INSERT INTO sales_order_lines
                (sales_order_id, item_id, warehouse_id, qty, unit_price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(line.sales_order_id)
        .bind(line.item_id)
        .bind(line.warehouse_id)
        .bind(line.qty)
        .bind(line.unit_price_cents)
        .execute(&self.pool)
        .await?;

        let mut saved = line.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }

    /// Removes a line from an order.
    pub async fn remove_line(&self, order_id: i64, line_id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "DELETE FROM sales_order_lines WHERE id = ?1 AND sales_order_id = ?2",
        )
        .bind(line_id)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("sales order line", line_id));
        }

        Ok(())
    }

    /// Persists a status change.
    pub async fn update_status(&self, order: &SalesOrder) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE sales_orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(order.id)
        .bind(order.status)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("sales order", order.id));
        }

        Ok(())
    }

    /// Searches orders by customer and status, newest first.
    pub async fn search(
        &self,
        filter: &SalesOrderSearch,
        page: PageRequest,
    ) -> DbResult<(Vec<SalesOrder>, i64)> {
        let rows = sqlx::query_as::<_, SalesOrder>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM sales_orders
            WHERE (?1 IS NULL OR customer_id = ?1)
              AND (?2 IS NULL OR status = ?2)
            ORDER BY id DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales_orders
            WHERE (?1 IS NULL OR customer_id = ?1)
              AND (?2 IS NULL OR status = ?2)
            "#,
        )
        .bind(filter.customer_id)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
