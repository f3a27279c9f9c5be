//! Inventory transaction journal routes (read-only).

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::state::AppState;
use minierp_core::{InventoryTransaction, PageResponse, TransactionType};
use minierp_db::repository::inventory::InventoryTransactionSearch;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_transactions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalParams {
    item_id: Option<i64>,
    warehouse_id: Option<i64>,
    #[serde(rename = "type")]
    tx_type: Option<TransactionType>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn search_transactions(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<JournalParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<InventoryTransaction>>>> {
    let filter = InventoryTransactionSearch {
        item_id: params.item_id,
        warehouse_id: params.warehouse_id,
        tx_type: params.tx_type,
        from: params.from,
        to: params.to,
    };
    let page = page_request(params.page, params.size);

    let (rows, total) = state.db.inventory_transactions().search(&filter, page).await?;
    Ok(Json(ApiResponse::ok(PageResponse::new(rows, page, total))))
}
