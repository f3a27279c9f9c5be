//! # Item Repository
//!
//! Database operations for item master data.
//!
//! ## Search Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    How Item Search Works                            │
//! │                                                                     │
//! │  Filters are prefix matches (LIKE 'term%'), so the B-tree indexes   │
//! │  on name and code are usable; a contains-match would scan.          │
//! │                                                                     │
//! │  GET /items?name=Bolt&page=2                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SELECT ... WHERE name LIKE 'Bolt%' ORDER BY id DESC                │
//! │  LIMIT 20 OFFSET 20        +  SELECT COUNT(*) with same filter      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use minierp_core::{Item, ItemStatus, PageRequest};

const ITEM_COLUMNS: &str = "id, name, code, base_price_cents, status, created_at, updated_at";

// =============================================================================
// Filter / Row Types
// =============================================================================

/// Search filter for item listings. Both filters are optional prefixes.
#[derive(Debug, Clone, Default)]
pub struct ItemSearch {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Condensed row for item listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemSummaryRecord {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub status: ItemStatus,
}

/// One row of the item detail join: the item plus one of its per-warehouse
/// balances (all NULL when the item has no stock rows yet).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemDetailRecord {
    pub item_id: i64,
    pub item_name: String,
    pub item_code: String,
    pub base_price_cents: i64,
    pub status: ItemStatus,
    pub warehouse_id: Option<i64>,
    pub warehouse_name: Option<String>,
    pub qty: Option<i64>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a new item and returns it with the assigned id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - item code already exists
    pub async fn insert(&self, item: &Item) -> DbResult<Item> {
        debug!(code = %item.code, "Inserting item");

        let result = sqlx::query(
            r#"
            INSERT INTO items (name, code, base_price_cents, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.name)
        .bind(&item.code)
        .bind(item.base_price_cents)
        .bind(item.status)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        let mut saved = item.clone();
        saved.id = result.last_insert_rowid();
        Ok(saved)
    }

    /// Gets an item by database id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item by business code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Loads all items with the given ids (order unspecified).
    pub async fn find_all_by_ids(&self, ids: &[i64]) -> DbResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, Item>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Searches items by name/code prefix, newest first.
    ///
    /// Returns the page rows and the total count for the same filter.
    pub async fn search(
        &self,
        filter: &ItemSearch,
        page: PageRequest,
    ) -> DbResult<(Vec<ItemSummaryRecord>, i64)> {
        debug!(?filter, "Searching items");

        let rows = sqlx::query_as::<_, ItemSummaryRecord>(
            r#"
            SELECT id, name, code, status
            FROM items
            WHERE (?1 IS NULL OR name LIKE ?1 || '%')
              AND (?2 IS NULL OR code LIKE ?2 || '%')
            ORDER BY id DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(&filter.name)
        .bind(&filter.code)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM items
            WHERE (?1 IS NULL OR name LIKE ?1 || '%')
              AND (?2 IS NULL OR code LIKE ?2 || '%')
            "#,
        )
        .bind(&filter.name)
        .bind(&filter.code)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Item detail rows: the item joined with its per-warehouse balances.
    ///
    /// Empty vec means the item does not exist; a single row with NULL
    /// warehouse columns means it exists but holds no stock anywhere.
    pub async fn get_detail(&self, item_id: i64) -> DbResult<Vec<ItemDetailRecord>> {
        let rows = sqlx::query_as::<_, ItemDetailRecord>(
            r#"
            SELECT
                i.id   AS item_id,
                i.name AS item_name,
                i.code AS item_code,
                i.base_price_cents,
                i.status,
                w.id   AS warehouse_id,
                w.name AS warehouse_name,
                s.qty
            FROM items i
            LEFT JOIN stocks s ON s.item_id = i.id
            LEFT JOIN warehouses w ON w.id = s.warehouse_id
            WHERE i.id = ?1
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Persists name, price, and status changes.
    pub async fn update(&self, item: &Item) -> DbResult<()> {
        debug!(id = item.id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                base_price_cents = ?3,
                status = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.base_price_cents)
        .bind(item.status)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("item", item.id));
        }

        Ok(())
    }

    /// Counts all items (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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

    fn item(name: &str, code: &str) -> Item {
        Item::create(name, code, 1500, ItemStatus::Active).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let repo = db.items();

        let saved = repo.insert(&item("Steel Bolt M8", "IC000001")).await.unwrap();
        assert!(saved.id > 0);

        let by_id = repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Steel Bolt M8");

        let by_code = repo.get_by_code("IC000001").await.unwrap().unwrap();
        assert_eq!(by_code.id, saved.id);

        assert!(repo.get_by_code("IC999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = test_db().await;
        let repo = db.items();

        repo.insert(&item("Bolt", "IC000001")).await.unwrap();
        let err = repo.insert(&item("Nut", "IC000001")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_prefix_and_paging() {
        let db = test_db().await;
        let repo = db.items();

        repo.insert(&item("Steel Bolt M8", "IC000001")).await.unwrap();
        repo.insert(&item("Steel Nut M8", "IC000002")).await.unwrap();
        repo.insert(&item("Copper Wire", "IC000003")).await.unwrap();

        let filter = ItemSearch {
            name: Some("Steel".into()),
            code: None,
        };
        let (rows, total) = repo.search(&filter, PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(total, 2);
        // Newest first.
        assert_eq!(rows[0].code, "IC000002");
        assert_eq!(rows[1].code, "IC000001");

        let (rows, total) = repo
            .search(&ItemSearch::default(), PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_detail_without_stock_rows() {
        let db = test_db().await;
        let repo = db.items();

        let saved = repo.insert(&item("Bolt", "IC000001")).await.unwrap();

        let rows = repo.get_detail(saved.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].warehouse_id.is_none());

        assert!(repo.get_detail(9999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let repo = db.items();

        let mut saved = repo.insert(&item("Bolt", "IC000001")).await.unwrap();
        saved.change_price(1800).unwrap();
        repo.update(&saved).await.unwrap();

        let reloaded = repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(reloaded.base_price_cents, 1800);
    }
}
