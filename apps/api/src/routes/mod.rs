//! HTTP routing. One module per domain; every module contributes a
//! `Router<AppState>` that gets nested under `/api`.
//!
//! Handlers stay thin: extract, delegate to a service, wrap in the
//! [`crate::response::ApiResponse`] envelope. Routes that take an
//! [`crate::auth::AuthUser`] argument require a valid access token.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use minierp_core::PageRequest;

pub mod auth;
pub mod health;
pub mod inventory;
pub mod items;
pub mod partners;
pub mod purchase_orders;
pub mod sales_orders;
pub mod stocks;
pub mod users;
pub mod warehouses;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/items", items::router())
        .nest("/api/partners", partners::router())
        .nest("/api/warehouses", warehouses::router())
        .nest("/api/stocks", stocks::router())
        .nest("/api/inventory-transactions", inventory::router())
        .nest("/api/purchase-orders", purchase_orders::router())
        .nest("/api/sales-orders", sales_orders::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds a [`PageRequest`] from optional query params.
pub(crate) fn page_request(page: Option<u32>, size: Option<u32>) -> PageRequest {
    let default = PageRequest::default();
    PageRequest::new(
        page.unwrap_or(default.page),
        size.unwrap_or(default.size),
    )
}
