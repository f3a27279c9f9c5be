//! Purchase order service: order lifecycle against suppliers, receiving
//! into stock.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::stock_service::{LineMap, StockService};
use minierp_core::{
    Item, PageRequest, PageResponse, PurchaseOrder, PurchaseOrderLine, PurchaseStatus, StockKey,
    Warehouse, MAX_ORDER_LINES,
};
use minierp_db::repository::purchase::PurchaseOrderSearch;
use minierp_db::Database;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineRequest {
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub unit_cost_cents: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRequest {
    pub supplier_id: i64,
    pub lines: Vec<PurchaseLineRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderSummary {
    pub id: i64,
    pub supplier_id: i64,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

impl From<PurchaseOrder> for PurchaseOrderSummary {
    fn from(o: PurchaseOrder) -> Self {
        PurchaseOrderSummary {
            id: o.id,
            supplier_id: o.supplier_id,
            status: o.status,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineDto {
    pub line_id: i64,
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub unit_cost_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetailResponse {
    pub id: i64,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub status: PurchaseStatus,
    pub lines: Vec<PurchaseLineDto>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Service
// =============================================================================

pub struct PurchaseOrderService {
    db: Database,
    stock: StockService,
}

impl PurchaseOrderService {
    pub fn new(db: Database) -> Self {
        let stock = StockService::new(db.clone());
        PurchaseOrderService { db, stock }
    }

    /// Creates a purchase order against a supplier with its initial lines.
    pub async fn create(&self, request: PurchaseOrderRequest) -> ApiResult<PurchaseOrderSummary> {
        let supplier = self
            .db
            .partners()
            .get_by_id(request.supplier_id)
            .await?
            .ok_or_else(|| ApiError::not_found("partner"))?;
        supplier.validate_supplier()?;

        let order = PurchaseOrder::create(supplier.id);
        let lines = self.build_lines(&order, &[], &request.lines).await?;

        let saved = self.db.purchase_orders().create(&order, &lines).await?;
        info!(purchase_order_id = saved.id, "Purchase order created");

        Ok(saved.into())
    }

    /// Adds a line to a CREATED order.
    pub async fn add_line(
        &self,
        order_id: i64,
        request: PurchaseLineRequest,
    ) -> ApiResult<()> {
        let order = self.load(order_id).await?;
        order.ensure_created()?;

        let existing = self.db.purchase_orders().get_lines(order_id).await?;
        let new_lines = self.build_lines(&order, &existing, &[request]).await?;

        // build_lines validated; exactly one line comes back
        let mut line = new_lines.into_iter().next().ok_or_else(|| {
            ApiError::Internal("line construction yielded no line".to_string())
        })?;
        line.purchase_order_id = order_id;

        self.db.purchase_orders().add_line(&line).await?;
        Ok(())
    }

    /// Removes a line from a CREATED order.
    pub async fn remove_line(&self, order_id: i64, line_id: i64) -> ApiResult<()> {
        let order = self.load(order_id).await?;
        order.ensure_created()?;

        self.db
            .purchase_orders()
            .remove_line(order_id, line_id)
            .await?;
        Ok(())
    }

    /// Places the order: CREATED -> ORDERED.
    pub async fn place(&self, order_id: i64) -> ApiResult<()> {
        let mut order = self.load(order_id).await?;
        let lines = self.db.purchase_orders().get_lines(order_id).await?;

        order.mark_as_ordered(lines.len())?;
        self.db.purchase_orders().update_status(&order).await?;

        info!(purchase_order_id = order_id, "Purchase order placed");
        Ok(())
    }

    /// Receives the order: ORDERED -> RECEIVED, booking inbound stock for
    /// every line.
    pub async fn receive(&self, order_id: i64) -> ApiResult<()> {
        let mut order = self.load(order_id).await?;
        order.mark_as_received()?;

        let lines = self.db.purchase_orders().get_lines(order_id).await?;
        let line_map = to_line_map(lines.iter().map(|l| (l.item_id, l.warehouse_id, l.qty)));

        // Stock first; the status flips only after the goods are booked.
        self.stock.increase(&line_map, order_id).await?;
        self.db.purchase_orders().update_status(&order).await?;

        info!(purchase_order_id = order_id, "Purchase order received");
        Ok(())
    }

    /// Cancels the order. Stock is untouched: nothing was booked before
    /// receipt, and received orders cannot be cancelled.
    pub async fn cancel(&self, order_id: i64) -> ApiResult<()> {
        let mut order = self.load(order_id).await?;
        order.cancel()?;
        self.db.purchase_orders().update_status(&order).await?;

        info!(purchase_order_id = order_id, "Purchase order cancelled");
        Ok(())
    }

    /// Order header, supplier name, and lines.
    pub async fn detail(&self, order_id: i64) -> ApiResult<PurchaseDetailResponse> {
        let order = self.load(order_id).await?;
        let lines = self.db.purchase_orders().get_lines(order_id).await?;

        let supplier = self
            .db
            .partners()
            .get_by_id(order.supplier_id)
            .await?
            .ok_or_else(|| ApiError::not_found("partner"))?;

        Ok(PurchaseDetailResponse {
            id: order.id,
            supplier_id: order.supplier_id,
            supplier_name: supplier.name,
            status: order.status,
            lines: lines
                .into_iter()
                .map(|l| PurchaseLineDto {
                    line_id: l.id,
                    item_id: l.item_id,
                    warehouse_id: l.warehouse_id,
                    qty: l.qty,
                    unit_cost_cents: l.unit_cost_cents,
                })
                .collect(),
            created_at: order.created_at,
        })
    }

    /// Paginated search by supplier and status.
    pub async fn search(
        &self,
        filter: PurchaseOrderSearch,
        page: PageRequest,
    ) -> ApiResult<PageResponse<PurchaseOrderSummary>> {
        let (rows, total) = self.db.purchase_orders().search(&filter, page).await?;
        let content = rows.into_iter().map(PurchaseOrderSummary::from).collect();
        Ok(PageResponse::new(content, page, total))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn load(&self, order_id: i64) -> ApiResult<PurchaseOrder> {
        self.db
            .purchase_orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("purchase order"))
    }

    /// Validates the referenced items/warehouses (existence and ACTIVE
    /// status), rejects duplicate (item, warehouse) pairs against both the
    /// existing lines and the request itself, and builds domain lines.
    async fn build_lines(
        &self,
        order: &PurchaseOrder,
        existing: &[PurchaseOrderLine],
        requests: &[PurchaseLineRequest],
    ) -> ApiResult<Vec<PurchaseOrderLine>> {
        let (items, warehouses) = self
            .load_references(
                requests.iter().map(|l| (l.item_id, l.warehouse_id)),
            )
            .await?;

        if existing.len() + requests.len() > MAX_ORDER_LINES {
            return Err(ApiError::BadRequest(format!(
                "an order may have at most {MAX_ORDER_LINES} lines"
            )));
        }

        let mut lines: Vec<PurchaseOrderLine> = existing.to_vec();
        let mut built = Vec::with_capacity(requests.len());

        for request in requests {
            let item = items
                .get(&request.item_id)
                .ok_or_else(|| ApiError::not_found("item"))?;
            item.ensure_available()?;

            let warehouse = warehouses
                .get(&request.warehouse_id)
                .ok_or_else(|| ApiError::not_found("warehouse"))?;
            warehouse.ensure_available()?;

            order.ensure_no_duplicate_line(&lines, request.item_id, request.warehouse_id)?;

            let line = PurchaseOrderLine::create(
                order.id,
                request.item_id,
                request.warehouse_id,
                request.qty,
                request.unit_cost_cents,
            )?;

            lines.push(line.clone());
            built.push(line);
        }

        Ok(built)
    }

    async fn load_references(
        &self,
        pairs: impl Iterator<Item = (i64, i64)>,
    ) -> ApiResult<(HashMap<i64, Item>, HashMap<i64, Warehouse>)> {
        let mut item_ids = Vec::new();
        let mut warehouse_ids = Vec::new();
        for (item_id, warehouse_id) in pairs {
            if !item_ids.contains(&item_id) {
                item_ids.push(item_id);
            }
            if !warehouse_ids.contains(&warehouse_id) {
                warehouse_ids.push(warehouse_id);
            }
        }

        let items = self
            .db
            .items()
            .find_all_by_ids(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();
        let warehouses = self
            .db
            .warehouses()
            .find_all_by_ids(&warehouse_ids)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        Ok((items, warehouses))
    }
}

/// Folds (item, warehouse, qty) triples into a movement line map.
pub(crate) fn to_line_map(entries: impl Iterator<Item = (i64, i64, i64)>) -> LineMap {
    let mut map: BTreeMap<StockKey, i64> = BTreeMap::new();
    for (item_id, warehouse_id, qty) in entries {
        *map.entry(StockKey::new(item_id, warehouse_id)).or_insert(0) += qty;
    }
    map
}

// =============================================================================
// Unit Tests
// =============================================================================
