//! Purchase order routes.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::services::purchase_service::{
    PurchaseDetailResponse, PurchaseLineRequest, PurchaseOrderRequest, PurchaseOrderService,
    PurchaseOrderSummary,
};
use crate::state::AppState;
use minierp_core::{PageResponse, PurchaseStatus};
use minierp_db::repository::purchase::PurchaseOrderSearch;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(search_orders))
        .route("/:id", get(order_detail))
        .route("/:id/lines", post(add_line))
        .route("/:id/lines/:line_id", delete(remove_line))
        .route("/:id/place", patch(place_order))
        .route("/:id/receive", patch(receive_order))
        .route("/:id/cancel", patch(cancel_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseListParams {
    supplier_id: Option<i64>,
    status: Option<PurchaseStatus>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn create_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<PurchaseOrderRequest>,
) -> ApiResult<Json<ApiResponse<PurchaseOrderSummary>>> {
    let created = PurchaseOrderService::new(state.db.clone())
        .create(request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

async fn search_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<PurchaseListParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<PurchaseOrderSummary>>>> {
    let filter = PurchaseOrderSearch {
        supplier_id: params.supplier_id,
        status: params.status,
    };
    let page = page_request(params.page, params.size);

    let result = PurchaseOrderService::new(state.db.clone())
        .search(filter, page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn order_detail(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<PurchaseDetailResponse>>> {
    let detail = PurchaseOrderService::new(state.db.clone())
        .detail(order_id)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

async fn add_line(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
    Json(request): Json<PurchaseLineRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    PurchaseOrderService::new(state.db.clone())
        .add_line(order_id, request)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn remove_line(
    State(state): State<AppState>,
    Path((order_id, line_id)): Path<(i64, i64)>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    PurchaseOrderService::new(state.db.clone())
        .remove_line(order_id, line_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn place_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    PurchaseOrderService::new(state.db.clone())
        .place(order_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn receive_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    PurchaseOrderService::new(state.db.clone())
        .receive(order_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    PurchaseOrderService::new(state.db.clone())
        .cancel(order_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}
