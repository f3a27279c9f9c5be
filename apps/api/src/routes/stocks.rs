//! Stock routes: balances per item / per warehouse, stocktake adjustment.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::services::stock_service::{
    AdjustStockRequest, ItemStockResponse, StockService, WarehouseStockResponse,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items/:item_id", get(item_stock))
        .route("/warehouses/:warehouse_id", get(warehouse_stock))
        .route("/adjust", post(adjust_stock))
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<u32>,
    size: Option<u32>,
}

async fn item_stock(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    _user: AuthUser,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<ItemStockResponse>>> {
    let result = StockService::new(state.db.clone())
        .get_item_stock(item_id, page_request(params.page, params.size))
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn warehouse_stock(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
    _user: AuthUser,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<WarehouseStockResponse>>> {
    let result = StockService::new(state.db.clone())
        .get_warehouse_stock(warehouse_id, page_request(params.page, params.size))
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn adjust_stock(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AdjustStockRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    StockService::new(state.db.clone()).adjust(request).await?;
    Ok(Json(ApiResponse::ok_empty()))
}
