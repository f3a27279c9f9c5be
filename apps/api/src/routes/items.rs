//! Item routes.

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::services::item_service::{
    AddItemRequest, ChangeItemPriceRequest, ItemDetailResponse, ItemService, ItemSummary,
};
use crate::state::AppState;
use minierp_core::PageResponse;
use minierp_db::repository::item::ItemSearch;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_item).get(search_items))
        .route("/:id", get(item_detail))
        .route("/:id/price", patch(change_price))
        .route("/:id/deactivate", patch(deactivate_item))
}

#[derive(Debug, Deserialize)]
struct ItemListParams {
    name: Option<String>,
    code: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn add_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<Json<ApiResponse<ItemSummary>>> {
    let created = ItemService::new(state.db.clone()).add_item(request).await?;
    Ok(Json(ApiResponse::ok(created)))
}

async fn search_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ItemListParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ItemSummary>>>> {
    let filter = ItemSearch {
        name: params.name,
        code: params.code,
    };
    let page = page_request(params.page, params.size);

    let result = ItemService::new(state.db.clone()).search(filter, page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn item_detail(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<ItemDetailResponse>>> {
    let detail = ItemService::new(state.db.clone())
        .get_item_detail(item_id)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

async fn change_price(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    _user: AuthUser,
    Json(request): Json<ChangeItemPriceRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    ItemService::new(state.db.clone())
        .change_price(item_id, request)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn deactivate_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    ItemService::new(state.db.clone())
        .deactivate_item(item_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}
