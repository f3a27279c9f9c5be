//! Partner routes.

use axum::extract::{Path, Query, State};
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::routes::page_request;
use crate::services::partner_service::{
    AddPartnerRequest, PartnerResponse, PartnerService, UpdatePartnerContactRequest,
};
use crate::state::AppState;
use minierp_core::{PageResponse, PartnerType};
use minierp_db::repository::partner::PartnerSearch;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_partner).get(search_partners))
        .route("/:id/contact", patch(update_contact))
}

#[derive(Debug, Deserialize)]
struct PartnerListParams {
    name: Option<String>,
    #[serde(rename = "type")]
    partner_type: Option<PartnerType>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn add_partner(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AddPartnerRequest>,
) -> ApiResult<Json<ApiResponse<PartnerResponse>>> {
    let created = PartnerService::new(state.db.clone())
        .add_partner(request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

async fn search_partners(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<PartnerListParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<PartnerResponse>>>> {
    let filter = PartnerSearch {
        name: params.name,
        partner_type: params.partner_type,
    };
    let page = page_request(params.page, params.size);

    let result = PartnerService::new(state.db.clone())
        .search(filter, page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(partner_id): Path<i64>,
    _user: AuthUser,
    Json(request): Json<UpdatePartnerContactRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    PartnerService::new(state.db.clone())
        .update_contact(partner_id, request)
        .await?;
    Ok(Json(ApiResponse::ok_empty()))
}
