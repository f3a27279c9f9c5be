//! Warehouse routes.

use axum::extract::{Path, Query, State};
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::services::warehouse_service::{
    AddWarehouseRequest, WarehouseResponse, WarehouseService,
};
use crate::state::AppState;
use minierp_core::{PageResponse, WarehouseStatus};
use minierp_db::repository::warehouse::WarehouseSearch;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_warehouse).get(search_warehouses))
        .route("/:id/activate", patch(activate_warehouse))
        .route("/:id/deactivate", patch(deactivate_warehouse))
}

#[derive(Debug, Deserialize)]
struct WarehouseListParams {
    name: Option<String>,
    location: Option<String>,
    status: Option<WarehouseStatus>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn add_warehouse(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AddWarehouseRequest>,
) -> ApiResult<Json<ApiResponse<WarehouseResponse>>> {
    let created = WarehouseService::new(state.db.clone())
        .add_warehouse(request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

async fn search_warehouses(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<WarehouseListParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<WarehouseResponse>>>> {
    let filter = WarehouseSearch {
        name: params.name,
        location: params.location,
        status: params.status,
    };
    let page = page_request(params.page, params.size);

    let result = WarehouseService::new(state.db.clone())
        .search(filter, page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn activate_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    WarehouseService::new(state.db.clone())
        .activate(warehouse_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn deactivate_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    WarehouseService::new(state.db.clone())
        .deactivate(warehouse_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}
