//! Stock service: multi-line stock movements with journal entries.
//!
//! ## Movement Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  How a movement set is applied                      │
//! │                                                                     │
//! │  lines: BTreeMap<StockKey, qty>   ← BTreeMap iterates in StockKey   │
//! │       │                             order = canonical lock order    │
//! │       ▼                                                             │
//! │  BEGIN                                                              │
//! │    for each (key, qty):                                             │
//! │      load stock row                                                 │
//! │        ├── missing + inbound-from-purchase → create with qty 0      │
//! │        └── missing otherwise → NOT_FOUND                            │
//! │      apply domain rule (increase / decrease)                        │
//! │      UPDATE stocks, INSERT inventory_transactions                   │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  Unique-violation on create (concurrent first movement for the      │
//! │  same key) and lock contention retry up to 3 times with backoff.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use minierp_core::{
    CoreError, InventoryTransaction, PageRequest, PageResponse, Stock, StockKey,
};
use minierp_db::{Database, DbError};

/// Maximum attempts for a conflicting movement set.
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff between attempts; doubles per retry.
const BACKOFF: Duration = Duration::from_millis(50);

/// Quantities per stock key. BTreeMap, not HashMap: iteration order is the
/// lock order.
pub type LineMap = BTreeMap<StockKey, i64>;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    pub item_id: i64,
    pub warehouse_id: i64,
    /// The counted quantity; the delta against the book quantity is what
    /// gets journaled.
    pub actual_qty: i64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStockRow {
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub qty: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStockResponse {
    pub item: ItemInfo,
    pub stocks: PageResponse<ItemStockRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseInfo {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStockRow {
    pub item_id: i64,
    pub item_name: String,
    pub item_code: String,
    pub qty: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStockResponse {
    pub warehouse: WarehouseInfo,
    pub stocks: PageResponse<WarehouseStockRow>,
}

// =============================================================================
// Movement Kind
// =============================================================================

/// What a movement set is, and which journal rows it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovementKind {
    /// Receiving a purchase order. May create missing stock rows.
    PurchaseInbound,
    /// Placing a sales order.
    SalesOutbound,
    /// Cancelling a placed sales order; books the quantities back in.
    SalesCancelInbound,
}

impl MovementKind {
    /// Only purchase receipts may create a balance row for a key the
    /// warehouse has never held.
    fn allow_create(self) -> bool {
        matches!(self, MovementKind::PurchaseInbound)
    }
}

/// Internal error split: lets the retry loop see database conflicts
/// without flattening them into ApiError too early.
enum MovementError {
    Db(DbError),
    Core(CoreError),
}

impl From<DbError> for MovementError {
    fn from(e: DbError) -> Self {
        MovementError::Db(e)
    }
}

impl From<CoreError> for MovementError {
    fn from(e: CoreError) -> Self {
        MovementError::Core(e)
    }
}

impl From<MovementError> for ApiError {
    fn from(e: MovementError) -> Self {
        match e {
            MovementError::Db(e) => e.into(),
            MovementError::Core(e) => e.into(),
        }
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct StockService {
    db: Database,
}

impl StockService {
    pub fn new(db: Database) -> Self {
        StockService { db }
    }

    /// Books inbound stock for a received purchase order. Creates missing
    /// balance rows.
    pub async fn increase(&self, lines: &LineMap, purchase_order_id: i64) -> ApiResult<()> {
        self.apply_with_retry(lines, purchase_order_id, MovementKind::PurchaseInbound)
            .await
    }

    /// Books outbound stock for a placed sales order. Every key must have
    /// a balance row with sufficient quantity.
    pub async fn decrease(&self, lines: &LineMap, sales_order_id: i64) -> ApiResult<()> {
        self.apply_with_retry(lines, sales_order_id, MovementKind::SalesOutbound)
            .await
    }

    /// Books stock back in for a cancelled sales order.
    pub async fn restore(&self, lines: &LineMap, sales_order_id: i64) -> ApiResult<()> {
        self.apply_with_retry(lines, sales_order_id, MovementKind::SalesCancelInbound)
            .await
    }

    /// Stocktake adjustment: sets the balance to the counted quantity and
    /// journals the signed delta with the given reason.
    pub async fn adjust(&self, request: AdjustStockRequest) -> ApiResult<()> {
        if request.actual_qty < 0 {
            return Err(ApiError::BadRequest(
                "counted quantity cannot be negative".to_string(),
            ));
        }

        // Referenced item/warehouse must exist; the stock row itself may not.
        self.db
            .items()
            .get_by_id(request.item_id)
            .await?
            .ok_or_else(|| ApiError::not_found("item"))?;
        self.db
            .warehouses()
            .get_by_id(request.warehouse_id)
            .await?
            .ok_or_else(|| ApiError::not_found("warehouse"))?;

        let key = StockKey::new(request.item_id, request.warehouse_id);

        let mut attempt = 1;
        loop {
            match self.try_adjust(key, request.actual_qty, &request.reason).await {
                Ok(()) => return Ok(()),
                Err(MovementError::Db(e)) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %e, "Stock adjust conflict, retrying");
                    tokio::time::sleep(BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Per-warehouse balances of one item.
    pub async fn get_item_stock(
        &self,
        item_id: i64,
        page: PageRequest,
    ) -> ApiResult<ItemStockResponse> {
        let info = self
            .db
            .stocks()
            .get_item_info(item_id)
            .await?
            .ok_or_else(|| ApiError::not_found("item"))?;

        let (rows, total) = self.db.stocks().get_item_stock(item_id, page).await?;
        let content = rows
            .into_iter()
            .map(|r| ItemStockRow {
                warehouse_id: r.warehouse_id,
                warehouse_name: r.warehouse_name,
                qty: r.qty,
            })
            .collect();

        Ok(ItemStockResponse {
            item: ItemInfo {
                id: info.id,
                name: info.name,
                code: info.code,
            },
            stocks: PageResponse::new(content, page, total),
        })
    }

    /// Per-item balances held in one warehouse.
    pub async fn get_warehouse_stock(
        &self,
        warehouse_id: i64,
        page: PageRequest,
    ) -> ApiResult<WarehouseStockResponse> {
        let info = self
            .db
            .stocks()
            .get_warehouse_info(warehouse_id)
            .await?
            .ok_or_else(|| ApiError::not_found("warehouse"))?;

        let (rows, total) = self
            .db
            .stocks()
            .get_warehouse_stock(warehouse_id, page)
            .await?;
        let content = rows
            .into_iter()
            .map(|r| WarehouseStockRow {
                item_id: r.item_id,
                item_name: r.item_name,
                item_code: r.item_code,
                qty: r.qty,
            })
            .collect();

        Ok(WarehouseStockResponse {
            warehouse: WarehouseInfo {
                id: info.id,
                name: info.name,
                code: info.code,
            },
            stocks: PageResponse::new(content, page, total),
        })
    }

    // =========================================================================
    // Movement application
    // =========================================================================

    async fn apply_with_retry(
        &self,
        lines: &LineMap,
        ref_id: i64,
        kind: MovementKind,
    ) -> ApiResult<()> {
        if lines.is_empty() || ref_id <= 0 {
            return Err(ApiError::BadRequest(
                "movement requires a reference id and at least one line".to_string(),
            ));
        }

        let mut attempt = 1;
        loop {
            match self.try_apply(lines, ref_id, kind).await {
                Ok(()) => return Ok(()),
                Err(MovementError::Db(e)) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %e, "Stock movement conflict, retrying");
                    tokio::time::sleep(BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// One attempt: balances and journal rows in a single transaction,
    /// keys processed in StockKey order.
    async fn try_apply(
        &self,
        lines: &LineMap,
        ref_id: i64,
        kind: MovementKind,
    ) -> Result<(), MovementError> {
        debug!(?kind, ref_id, lines = lines.len(), "Applying stock movement");

        let stocks = self.db.stocks();
        let journal = self.db.inventory_transactions();

        let mut tx = self.db.begin().await?;

        for (key, qty) in lines {
            let existing = stocks.find_by_key_tx(&mut tx, *key).await?;

            let mut stock = match existing {
                Some(stock) => stock,
                None if kind.allow_create() => {
                    stocks.insert_tx(&mut tx, &Stock::create(*key)).await?
                }
                None => {
                    return Err(MovementError::Db(DbError::not_found(
                        "stock",
                        format!("item {} / warehouse {}", key.item_id, key.warehouse_id),
                    )))
                }
            };

            let entry = match kind {
                MovementKind::PurchaseInbound => {
                    stock.increase(*qty)?;
                    InventoryTransaction::purchase_inbound(
                        key.item_id,
                        key.warehouse_id,
                        *qty,
                        ref_id,
                    )?
                }
                MovementKind::SalesOutbound => {
                    stock.decrease(*qty)?;
                    InventoryTransaction::sales_outbound(
                        key.item_id,
                        key.warehouse_id,
                        *qty,
                        ref_id,
                    )?
                }
                MovementKind::SalesCancelInbound => {
                    stock.increase(*qty)?;
                    InventoryTransaction::cancel_sales_inbound(
                        key.item_id,
                        key.warehouse_id,
                        *qty,
                        ref_id,
                    )?
                }
            };

            stocks.set_qty_tx(&mut tx, &stock).await?;
            journal.insert_tx(&mut tx, &entry).await?;
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }

    async fn try_adjust(
        &self,
        key: StockKey,
        actual_qty: i64,
        reason: &str,
    ) -> Result<(), MovementError> {
        let stocks = self.db.stocks();
        let journal = self.db.inventory_transactions();

        let mut tx = self.db.begin().await?;

        let mut stock = match stocks.find_by_key_tx(&mut tx, key).await? {
            Some(stock) => stock,
            None => stocks.insert_tx(&mut tx, &Stock::create(key)).await?,
        };

        let delta = actual_qty - stock.qty;

        // Rejects delta == 0 and blank reasons.
        let entry = InventoryTransaction::adjust(key.item_id, key.warehouse_id, delta, reason)?;

        stock.adjust(delta);
        stocks.set_qty_tx(&mut tx, &stock).await?;
        journal.insert_tx(&mut tx, &entry).await?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minierp_core::{
        Item, ItemStatus, TransactionType, Warehouse, WarehouseStatus,
    };
    use minierp_db::repository::inventory::InventoryTransactionSearch;
    use minierp_db::DbConfig;

    async fn service() -> StockService {
        StockService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    async fn seed_key(svc: &StockService) -> StockKey {
        let item = svc
            .db
            .items()
            .insert(&Item::create("Bolt", "IC000001", 1500, ItemStatus::Active).unwrap())
            .await
            .unwrap();
        let warehouse = svc
            .db
            .warehouses()
            .insert(&Warehouse::create("Central", "12 Dock Road", WarehouseStatus::Active).unwrap())
            .await
            .unwrap();
        StockKey::new(item.id, warehouse.id)
    }

    fn lines(key: StockKey, qty: i64) -> LineMap {
        let mut map = LineMap::new();
        map.insert(key, qty);
        map
    }

    #[tokio::test]
    async fn test_increase_creates_row_and_journal() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        svc.increase(&lines(key, 10), 1).await.unwrap();

        let stock = svc.db.stocks().get_by_key(key).await.unwrap().unwrap();
        assert_eq!(stock.qty, 10);

        let (journal, total) = svc
            .db
            .inventory_transactions()
            .search(&InventoryTransactionSearch::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(journal[0].tx_type, TransactionType::Inbound);
        assert_eq!(journal[0].qty_delta, 10);
    }

    #[tokio::test]
    async fn test_decrease_requires_existing_stock() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        let err = svc.decrease(&lines(key, 1), 7).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_decrease_insufficient_is_conflict_and_rolls_back() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        svc.increase(&lines(key, 3), 1).await.unwrap();

        let err = svc.decrease(&lines(key, 5), 7).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Nothing applied, nothing journaled beyond the inbound.
        let stock = svc.db.stocks().get_by_key(key).await.unwrap().unwrap();
        assert_eq!(stock.qty, 3);

        let (_, total) = svc
            .db
            .inventory_transactions()
            .search(&InventoryTransactionSearch::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_decrease_then_restore_round_trips() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        svc.increase(&lines(key, 10), 1).await.unwrap();
        svc.decrease(&lines(key, 4), 7).await.unwrap();
        svc.restore(&lines(key, 4), 7).await.unwrap();

        let stock = svc.db.stocks().get_by_key(key).await.unwrap().unwrap();
        assert_eq!(stock.qty, 10);
    }

    #[tokio::test]
    async fn test_empty_lines_rejected() {
        let svc = service().await;

        let err = svc.increase(&LineMap::new(), 1).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_adjust_sets_counted_quantity() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        svc.increase(&lines(key, 10), 1).await.unwrap();

        svc.adjust(AdjustStockRequest {
            item_id: key.item_id,
            warehouse_id: key.warehouse_id,
            actual_qty: 7,
            reason: "stocktake: 3 damaged".into(),
        })
        .await
        .unwrap();

        let stock = svc.db.stocks().get_by_key(key).await.unwrap().unwrap();
        assert_eq!(stock.qty, 7);

        let (journal, _) = svc
            .db
            .inventory_transactions()
            .search(
                &InventoryTransactionSearch {
                    tx_type: Some(TransactionType::Adjust),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(journal[0].qty_delta, -3);
    }

    #[tokio::test]
    async fn test_adjust_without_change_rejected() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        svc.increase(&lines(key, 5), 1).await.unwrap();

        let err = svc
            .adjust(AdjustStockRequest {
                item_id: key.item_id,
                warehouse_id: key.warehouse_id,
                actual_qty: 5,
                reason: "no-op".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_item_stock_view() {
        let svc = service().await;
        let key = seed_key(&svc).await;

        svc.increase(&lines(key, 12), 1).await.unwrap();

        let view = svc
            .get_item_stock(key.item_id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(view.item.code, "IC000001");
        assert_eq!(view.stocks.content[0].qty, 12);
        assert_eq!(view.stocks.page_info.total_elements, 1);
    }
}
