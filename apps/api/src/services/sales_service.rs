//! Sales order service: order lifecycle against customers, outbound stock
//! on placement, restoration on cancel.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::purchase_service::to_line_map;
use crate::services::stock_service::StockService;
use minierp_core::{
    Item, OrderCustomerInfo, PageRequest, PageResponse, SalesOrder, SalesOrderLine, SalesStatus,
    ShippingAddress, Warehouse, MAX_ORDER_LINES,
};
use minierp_db::repository::sales::SalesOrderSearch;
use minierp_db::Database;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderRequest {
    pub partner_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub zipcode: String,
    pub address1: String,
    pub address2: Option<String>,
    pub lines: Vec<SaleLineRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderSummary {
    pub id: i64,
    pub customer_id: i64,
    pub status: SalesStatus,
    pub created_at: DateTime<Utc>,
}

impl From<SalesOrder> for SalesOrderSummary {
    fn from(o: SalesOrder) -> Self {
        SalesOrderSummary {
            id: o.id,
            customer_id: o.customer_id,
            status: o.status,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesLineDto {
    pub line_id: i64,
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDetailResponse {
    pub id: i64,
    pub customer_id: i64,
    pub customer_partner_name: String,
    pub status: SalesStatus,
    pub customer_name: String,
    pub customer_phone: String,
    pub zipcode: String,
    pub address1: String,
    pub address2: Option<String>,
    pub lines: Vec<SalesLineDto>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Service
// =============================================================================

pub struct SalesOrderService {
    db: Database,
    stock: StockService,
}

impl SalesOrderService {
    pub fn new(db: Database) -> Self {
        let stock = StockService::new(db.clone());
        SalesOrderService { db, stock }
    }

    /// Creates a sales order against a customer with its initial lines.
    pub async fn create(&self, request: SalesOrderRequest) -> ApiResult<SalesOrderSummary> {
        let customer = self
            .db
            .partners()
            .get_by_id(request.partner_id)
            .await?
            .ok_or_else(|| ApiError::not_found("partner"))?;
        customer.validate_customer()?;

        let order = SalesOrder::create(
            customer.id,
            OrderCustomerInfo::new(request.customer_name, request.customer_phone)?,
            ShippingAddress::new(request.zipcode, request.address1, request.address2)?,
        );

        let lines = self.build_lines(&order, &[], &request.lines).await?;

        let saved = self.db.sales_orders().create(&order, &lines).await?;
        info!(sales_order_id = saved.id, "Sales order created");

        Ok(saved.into())
    }

    /// Adds a line to a CREATED order.
    pub async fn add_line(&self, order_id: i64, request: SaleLineRequest) -> ApiResult<()> {
        let order = self.load(order_id).await?;
        order.ensure_created()?;

        let existing = self.db.sales_orders().get_lines(order_id).await?;
        let new_lines = self.build_lines(&order, &existing, &[request]).await?;

        let mut line = new_lines.into_iter().next().ok_or_else(|| {
            ApiError::Internal("line construction yielded no line".to_string())
        })?;
        line.sales_order_id = order_id;

        self.db.sales_orders().add_line(&line).await?;
        Ok(())
    }

    /// Removes a line from a CREATED order.
    pub async fn remove_line(&self, order_id: i64, line_id: i64) -> ApiResult<()> {
        let order = self.load(order_id).await?;
        order.ensure_created()?;

        self.db.sales_orders().remove_line(order_id, line_id).await?;
        Ok(())
    }

    /// Places the order: CREATED -> ORDERED, booking outbound stock for
    /// every line. Insufficient stock anywhere fails the whole placement.
    pub async fn place(&self, order_id: i64) -> ApiResult<()> {
        let mut order = self.load(order_id).await?;
        let lines = self.db.sales_orders().get_lines(order_id).await?;

        order.mark_as_ordered(lines.len())?;

        let line_map = to_line_map(lines.iter().map(|l| (l.item_id, l.warehouse_id, l.qty)));
        self.stock.decrease(&line_map, order_id).await?;

        self.db.sales_orders().update_status(&order).await?;

        info!(sales_order_id = order_id, "Sales order placed");
        Ok(())
    }

    /// Ships the order: ORDERED -> SHIPPED.
    pub async fn ship(&self, order_id: i64) -> ApiResult<()> {
        let mut order = self.load(order_id).await?;
        order.mark_as_shipped()?;
        self.db.sales_orders().update_status(&order).await?;

        info!(sales_order_id = order_id, "Sales order shipped");
        Ok(())
    }

    /// Cancels the order. If it was already placed, the booked outbound
    /// quantities are restored.
    pub async fn cancel(&self, order_id: i64) -> ApiResult<()> {
        let mut order = self.load(order_id).await?;
        let was_ordered = order.is_ordered();

        order.cancel()?;

        if was_ordered {
            let lines = self.db.sales_orders().get_lines(order_id).await?;
            let line_map =
                to_line_map(lines.iter().map(|l| (l.item_id, l.warehouse_id, l.qty)));
            self.stock.restore(&line_map, order_id).await?;
        }

        self.db.sales_orders().update_status(&order).await?;

        info!(sales_order_id = order_id, was_ordered, "Sales order cancelled");
        Ok(())
    }

    /// Order header, customer partner name, embedded snapshots, and lines.
    pub async fn detail(&self, order_id: i64) -> ApiResult<SalesDetailResponse> {
        let order = self.load(order_id).await?;
        let lines = self.db.sales_orders().get_lines(order_id).await?;

        let customer = self
            .db
            .partners()
            .get_by_id(order.customer_id)
            .await?
            .ok_or_else(|| ApiError::not_found("partner"))?;

        Ok(SalesDetailResponse {
            id: order.id,
            customer_id: order.customer_id,
            customer_partner_name: customer.name,
            status: order.status,
            customer_name: order.customer_info.customer_name,
            customer_phone: order.customer_info.customer_phone,
            zipcode: order.shipping_address.zipcode,
            address1: order.shipping_address.address1,
            address2: order.shipping_address.address2,
            lines: lines
                .into_iter()
                .map(|l| SalesLineDto {
                    line_id: l.id,
                    item_id: l.item_id,
                    warehouse_id: l.warehouse_id,
                    qty: l.qty,
                    unit_price_cents: l.unit_price_cents,
                })
                .collect(),
            created_at: order.created_at,
        })
    }

    /// Paginated search by customer and status.
    pub async fn search(
        &self,
        filter: SalesOrderSearch,
        page: PageRequest,
    ) -> ApiResult<PageResponse<SalesOrderSummary>> {
        let (rows, total) = self.db.sales_orders().search(&filter, page).await?;
        let content = rows.into_iter().map(SalesOrderSummary::from).collect();
        Ok(PageResponse::new(content, page, total))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn load(&self, order_id: i64) -> ApiResult<SalesOrder> {
        self.db
            .sales_orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("sales order"))
    }

    /// Same reference validation as purchase orders: items/warehouses must
    /// exist and be ACTIVE, (item, warehouse) pairs must be unique.
    async fn build_lines(
        &self,
        order: &SalesOrder,
        existing: &[SalesOrderLine],
        requests: &[SaleLineRequest],
    ) -> ApiResult<Vec<SalesOrderLine>> {
        let mut item_ids = Vec::new();
        let mut warehouse_ids = Vec::new();
        for request in requests {
            if !item_ids.contains(&request.item_id) {
                item_ids.push(request.item_id);
            }
            if !warehouse_ids.contains(&request.warehouse_id) {
                warehouse_ids.push(request.warehouse_id);
            }
        }

        let items: HashMap<i64, Item> = self
            .db
            .items()
            .find_all_by_ids(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();
        let warehouses: HashMap<i64, Warehouse> = self
            .db
            .warehouses()
            .find_all_by_ids(&warehouse_ids)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        if existing.len() + requests.len() > MAX_ORDER_LINES {
            return Err(ApiError::BadRequest(format!(
                "an order may have at most {MAX_ORDER_LINES} lines"
            )));
        }

        let mut lines: Vec<SalesOrderLine> = existing.to_vec();
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

            let line = SalesOrderLine::create(
                order.id,
                request.item_id,
                request.warehouse_id,
                request.qty,
                request.unit_price_cents,
            )?;

            lines.push(line.clone());
            built.push(line);
        }

        Ok(built)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stock_service::LineMap;
    use minierp_core::{ItemStatus, Partner, PartnerType, StockKey, WarehouseStatus};
    use minierp_db::DbConfig;

    struct Ctx {
        svc: SalesOrderService,
        customer_id: i64,
        item_id: i64,
        warehouse_id: i64,
    }

    async fn ctx_with_stock(initial_qty: i64) -> Ctx {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db
            .partners()
            .insert(&Partner::create("Acme Foods", PartnerType::Customer, None, None).unwrap())
            .await
            .unwrap();
        let item = db
            .items()
            .insert(&Item::create("Bolt", "IC000001", 1500, ItemStatus::Active).unwrap())
            .await
            .unwrap();
        let warehouse = db
            .warehouses()
            .insert(
                &Warehouse::create("Central", "12 Dock Road", WarehouseStatus::Active).unwrap(),
            )
            .await
            .unwrap();

        if initial_qty > 0 {
            let mut map = LineMap::new();
            map.insert(StockKey::new(item.id, warehouse.id), initial_qty);
            StockService::new(db.clone()).increase(&map, 1).await.unwrap();
        }

        Ctx {
            svc: SalesOrderService::new(db),
            customer_id: customer.id,
            item_id: item.id,
            warehouse_id: warehouse.id,
        }
    }

    fn order_request(ctx: &Ctx, qty: i64) -> SalesOrderRequest {
        SalesOrderRequest {
            partner_id: ctx.customer_id,
            customer_name: "Kim".into(),
            customer_phone: "010-1234-5678".into(),
            zipcode: "04524".into(),
            address1: "21 Harbor St".into(),
            address2: None,
            lines: vec![SaleLineRequest {
                item_id: ctx.item_id,
                warehouse_id: ctx.warehouse_id,
                qty,
                unit_price_cents: 2500,
            }],
        }
    }

    async fn stock_qty(ctx: &Ctx) -> i64 {
        ctx.svc
            .db
            .stocks()
            .get_by_key(StockKey::new(ctx.item_id, ctx.warehouse_id))
            .await
            .unwrap()
            .map(|s| s.qty)
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_place_books_outbound_stock() {
        let ctx = ctx_with_stock(10).await;

        let created = ctx.svc.create(order_request(&ctx, 4)).await.unwrap();
        ctx.svc.place(created.id).await.unwrap();

        assert_eq!(stock_qty(&ctx).await, 6);

        let detail = ctx.svc.detail(created.id).await.unwrap();
        assert_eq!(detail.status, SalesStatus::Ordered);
        assert_eq!(detail.customer_partner_name, "Acme Foods");
    }

    #[tokio::test]
    async fn test_place_with_insufficient_stock_fails_whole_order() {
        let ctx = ctx_with_stock(3).await;

        let created = ctx.svc.create(order_request(&ctx, 5)).await.unwrap();
        let err = ctx.svc.place(created.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Status unchanged, stock unchanged.
        let detail = ctx.svc.detail(created.id).await.unwrap();
        assert_eq!(detail.status, SalesStatus::Created);
        assert_eq!(stock_qty(&ctx).await, 3);
    }

    #[tokio::test]
    async fn test_cancel_placed_order_restores_stock() {
        let ctx = ctx_with_stock(10).await;

        let created = ctx.svc.create(order_request(&ctx, 4)).await.unwrap();
        ctx.svc.place(created.id).await.unwrap();
        assert_eq!(stock_qty(&ctx).await, 6);

        ctx.svc.cancel(created.id).await.unwrap();
        assert_eq!(stock_qty(&ctx).await, 10);

        let detail = ctx.svc.detail(created.id).await.unwrap();
        assert_eq!(detail.status, SalesStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_unplaced_order_leaves_stock_alone() {
        let ctx = ctx_with_stock(10).await;

        let created = ctx.svc.create(order_request(&ctx, 4)).await.unwrap();
        ctx.svc.cancel(created.id).await.unwrap();

        assert_eq!(stock_qty(&ctx).await, 10);
    }

    #[tokio::test]
    async fn test_ship_requires_placed() {
        let ctx = ctx_with_stock(10).await;

        let created = ctx.svc.create(order_request(&ctx, 4)).await.unwrap();
        assert!(ctx.svc.ship(created.id).await.is_err());

        ctx.svc.place(created.id).await.unwrap();
        ctx.svc.ship(created.id).await.unwrap();

        // Shipped orders can no longer be cancelled.
        assert!(ctx.svc.cancel(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_item() {
        let ctx = ctx_with_stock(10).await;

        let mut item = ctx
            .svc
            .db
            .items()
            .get_by_id(ctx.item_id)
            .await
            .unwrap()
            .unwrap();
        item.deactivate();
        ctx.svc.db.items().update(&item).await.unwrap();

        let err = ctx.svc.create(order_request(&ctx, 1)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
