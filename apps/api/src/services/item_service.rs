//! Item service: registration with generated codes, price changes,
//! deactivation, search, and the stock-joined detail view.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use minierp_core::{Item, ItemStatus, PageRequest, PageResponse};
use minierp_db::repository::item::{ItemSearch, ItemSummaryRecord};
use minierp_db::Database;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub name: String,
    pub base_price_cents: i64,
    pub status: ItemStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeItemPriceRequest {
    pub base_price_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub status: ItemStatus,
}

impl From<ItemSummaryRecord> for ItemSummary {
    fn from(r: ItemSummaryRecord) -> Self {
        ItemSummary {
            id: r.id,
            name: r.name,
            code: r.code,
            status: r.status,
        }
    }
}

/// One warehouse balance inside the item detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStock {
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub qty: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailResponse {
    pub item_id: i64,
    pub name: String,
    pub code: String,
    pub status: ItemStatus,
    pub base_price_cents: i64,
    pub stocks: Vec<WarehouseStock>,
}

// =============================================================================
// Service
// =============================================================================

pub struct ItemService {
    db: Database,
}

impl ItemService {
    pub fn new(db: Database) -> Self {
        ItemService { db }
    }

    /// Registers a new item. The business code comes from the shared
    /// sequence, never from the caller.
    pub async fn add_item(&self, request: AddItemRequest) -> ApiResult<ItemSummary> {
        let code = self.db.item_codes().next_code().await?;

        let item = Item::create(request.name, code, request.base_price_cents, request.status)?;
        let saved = self.db.items().insert(&item).await?;

        Ok(ItemSummary {
            id: saved.id,
            name: saved.name,
            code: saved.code,
            status: saved.status,
        })
    }

    /// Marks an item INACTIVE.
    pub async fn deactivate_item(&self, item_id: i64) -> ApiResult<()> {
        let mut item = self
            .db
            .items()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| ApiError::not_found("item"))?;

        item.deactivate();
        self.db.items().update(&item).await?;
        Ok(())
    }

    /// Changes the base price.
    pub async fn change_price(
        &self,
        item_id: i64,
        request: ChangeItemPriceRequest,
    ) -> ApiResult<()> {
        let mut item = self
            .db
            .items()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| ApiError::not_found("item"))?;

        item.change_price(request.base_price_cents)?;
        self.db.items().update(&item).await?;
        Ok(())
    }

    /// Paginated prefix search.
    pub async fn search(
        &self,
        filter: ItemSearch,
        page: PageRequest,
    ) -> ApiResult<PageResponse<ItemSummary>> {
        let (rows, total) = self.db.items().search(&filter, page).await?;
        let content = rows.into_iter().map(ItemSummary::from).collect();
        Ok(PageResponse::new(content, page, total))
    }

    /// Item detail with its per-warehouse balances.
    pub async fn get_item_detail(&self, item_id: i64) -> ApiResult<ItemDetailResponse> {
        let rows = self.db.items().get_detail(item_id).await?;

        let first = rows.first().ok_or_else(|| ApiError::not_found("item"))?;

        let stocks = rows
            .iter()
            .filter_map(|r| {
                Some(WarehouseStock {
                    warehouse_id: r.warehouse_id?,
                    warehouse_name: r.warehouse_name.clone().unwrap_or_default(),
                    qty: r.qty.unwrap_or(0),
                })
            })
            .collect();

        Ok(ItemDetailResponse {
            item_id: first.item_id,
            name: first.item_name.clone(),
            code: first.item_code.clone(),
            status: first.status,
            base_price_cents: first.base_price_cents,
            stocks,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minierp_db::DbConfig;

    async fn service() -> ItemService {
        ItemService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_add_item_generates_codes() {
        let svc = service().await;

        let a = svc
            .add_item(AddItemRequest {
                name: "Steel Bolt M8".into(),
                base_price_cents: 1500,
                status: ItemStatus::Active,
            })
            .await
            .unwrap();
        let b = svc
            .add_item(AddItemRequest {
                name: "Steel Nut M8".into(),
                base_price_cents: 900,
                status: ItemStatus::Active,
            })
            .await
            .unwrap();

        assert_eq!(a.code, "IC000001");
        assert_eq!(b.code, "IC000002");
    }

    #[tokio::test]
    async fn test_deactivate_and_detail() {
        let svc = service().await;

        let created = svc
            .add_item(AddItemRequest {
                name: "Bolt".into(),
                base_price_cents: 1500,
                status: ItemStatus::Active,
            })
            .await
            .unwrap();

        svc.deactivate_item(created.id).await.unwrap();

        let detail = svc.get_item_detail(created.id).await.unwrap();
        assert_eq!(detail.status, ItemStatus::Inactive);
        assert!(detail.stocks.is_empty());

        let err = svc.get_item_detail(9999).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_price() {
        let svc = service().await;

        let created = svc
            .add_item(AddItemRequest {
                name: "Bolt".into(),
                base_price_cents: 1500,
                status: ItemStatus::Active,
            })
            .await
            .unwrap();

        svc.change_price(
            created.id,
            ChangeItemPriceRequest {
                base_price_cents: 1800,
            },
        )
        .await
        .unwrap();

        let detail = svc.get_item_detail(created.id).await.unwrap();
        assert_eq!(detail.base_price_cents, 1800);
    }
}
