//! Sales order routes.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::services::sales_service::{
    SaleLineRequest, SalesDetailResponse, SalesOrderRequest, SalesOrderService, SalesOrderSummary,
};
use crate::state::AppState;
use minierp_core::{PageResponse, SalesStatus};
use minierp_db::repository::sales::SalesOrderSearch;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(search_orders))
        .route("/:id", get(order_detail))
        .route("/:id/lines", post(add_line))
        .route("/:id/lines/:line_id", delete(remove_line))
        .route("/:id/place", patch(place_order))
        .route("/:id/ship", patch(ship_order))
        .route("/:id/cancel", patch(cancel_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalesListParams {
    customer_id: Option<i64>,
    status: Option<SalesStatus>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn create_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<SalesOrderRequest>,
) -> ApiResult<Json<ApiResponse<SalesOrderSummary>>> {
    let created = SalesOrderService::new(state.db.clone())
        .create(request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

async fn search_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SalesListParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<SalesOrderSummary>>>> {
    let filter = SalesOrderSearch {
        customer_id: params.customer_id,
        status: params.status,
    };
    let page = page_request(params.page, params.size);

    let result = SalesOrderService::new(state.db.clone())
        .search(filter, page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn order_detail(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<SalesDetailResponse>>> {
    let detail = SalesOrderService::new(state.db.clone())
        .detail(order_id)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

async fn add_line(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
    Json(request): Json<SaleLineRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    SalesOrderService::new(state.db.clone())
        .add_line(order_id, request)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn remove_line(
    State(state): State<AppState>,
    Path((order_id, line_id)): Path<(i64, i64)>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    SalesOrderService::new(state.db.clone())
        .remove_line(order_id, line_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn place_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    SalesOrderService::new(state.db.clone())
        .place(order_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn ship_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    SalesOrderService::new(state.db.clone())
        .ship(order_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    SalesOrderService::new(state.db.clone())
        .cancel(order_id)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}
