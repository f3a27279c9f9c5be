//! Application bootstrap tests.
//!
//! Assembles the full application — configuration, ephemeral in-memory
//! database with migrations, JWT manager, router — and verifies the
//! dependency graph comes up and serves requests end to end. The cache
//! dependency is optional at runtime and stays absent here.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use minierp_api::auth::hash_password;
use minierp_api::routes;
use minierp_api::state::AppState;
use minierp_core::User;

async fn test_state() -> AppState {
    AppState::for_tests().await.expect("state assembles")
}

/// Sends one request through the router and returns (status, parsed body).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn context_loads() {
    // The original purpose of this test: the whole dependency graph must
    // assemble without error against ephemeral dependencies.
    let state = test_state().await;

    assert!(state.db.health_check().await);
    assert!(state.redis.is_none());

    // Router construction wires every route against the state.
    let _app = routes::app(state);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = routes::app(test_state().await);

    let (status, body) = send(app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["cacheConfigured"], false);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = routes::app(test_state().await);

    let (status, body) = send(app, "GET", "/api/items", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_and_crud_flow_end_to_end() {
    let state = test_state().await;

    // Seed a user the way UserService would: argon2 hash in the row.
    let hash = hash_password("hunter2").unwrap();
    state
        .db
        .users()
        .insert(&User::create("Kim", "EMP-1024", hash).unwrap())
        .await
        .unwrap();

    let app = routes::app(state);

    // Wrong password never yields tokens.
    let (status, _) = send(
        app.clone(),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "employeeNumber": "EMP-1024", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Login.
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "employeeNumber": "EMP-1024", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();

    // Create an item; the code comes from the sequence.
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/items",
        Some(&token),
        Some(json!({ "name": "Steel Bolt M8", "basePriceCents": 1500, "status": "ACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "IC000001");
    let item_id = body["data"]["id"].as_i64().unwrap();

    // Search finds it by name prefix.
    let (status, body) = send(
        app.clone(),
        "GET",
        "/api/items?name=Steel",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pageInfo"]["totalElements"], 1);

    // Detail of a missing item maps to the envelope error format.
    let (status, body) = send(app.clone(), "GET", "/api/items/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Detail of the real item.
    let (status, body) = send(
        app.clone(),
        "GET",
        &format!("/api/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Steel Bolt M8");
}

#[tokio::test]
async fn purchase_to_sales_stock_flow() {
    let state = test_state().await;

    let hash = hash_password("hunter2").unwrap();
    state
        .db
        .users()
        .insert(&User::create("Kim", "EMP-1024", hash).unwrap())
        .await
        .unwrap();

    let app = routes::app(state);

    let (_, body) = send(
        app.clone(),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "employeeNumber": "EMP-1024", "password": "hunter2" })),
    )
    .await;
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();

    // Master data.
    let (_, body) = send(
        app.clone(),
        "POST",
        "/api/items",
        Some(&token),
        Some(json!({ "name": "Bolt", "basePriceCents": 1500, "status": "ACTIVE" })),
    )
    .await;
    let item_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        app.clone(),
        "POST",
        "/api/warehouses",
        Some(&token),
        Some(json!({ "name": "Central", "location": "12 Dock Road", "status": "ACTIVE" })),
    )
    .await;
    let warehouse_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        app.clone(),
        "POST",
        "/api/partners",
        Some(&token),
        Some(json!({ "name": "Steel Works", "type": "SUPPLIER" })),
    )
    .await;
    let supplier_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        app.clone(),
        "POST",
        "/api/partners",
        Some(&token),
        Some(json!({ "name": "Acme Foods", "type": "CUSTOMER" })),
    )
    .await;
    let customer_id = body["data"]["id"].as_i64().unwrap();

    // Purchase 10 units and receive them.
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/purchase-orders",
        Some(&token),
        Some(json!({
            "supplierId": supplier_id,
            "lines": [{
                "itemId": item_id,
                "warehouseId": warehouse_id,
                "qty": 10,
                "unitCostCents": 1200
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let po_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        app.clone(),
        "PATCH",
        &format!("/api/purchase-orders/{po_id}/place"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app.clone(),
        "PATCH",
        &format!("/api/purchase-orders/{po_id}/receive"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Stock view shows the received quantity.
    let (_, body) = send(
        app.clone(),
        "GET",
        &format!("/api/stocks/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["stocks"]["content"][0]["qty"], 10);

    // Sell 4 units.
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/sales-orders",
        Some(&token),
        Some(json!({
            "partnerId": customer_id,
            "customerName": "Kim",
            "customerPhone": "010-1234-5678",
            "zipcode": "04524",
            "address1": "21 Harbor St",
            "lines": [{
                "itemId": item_id,
                "warehouseId": warehouse_id,
                "qty": 4,
                "unitPriceCents": 2500
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let so_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        app.clone(),
        "PATCH",
        &format!("/api/sales-orders/{so_id}/place"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        app.clone(),
        "GET",
        &format!("/api/stocks/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["stocks"]["content"][0]["qty"], 6);

    // Selling more than remains is a conflict.
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/sales-orders",
        Some(&token),
        Some(json!({
            "partnerId": customer_id,
            "customerName": "Kim",
            "customerPhone": "010-1234-5678",
            "zipcode": "04524",
            "address1": "21 Harbor St",
            "lines": [{
                "itemId": item_id,
                "warehouseId": warehouse_id,
                "qty": 100,
                "unitPriceCents": 2500
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let big_so_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app.clone(),
        "PATCH",
        &format!("/api/sales-orders/{big_so_id}/place"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    // The journal recorded inbound and outbound movements.
    let (_, body) = send(
        app.clone(),
        "GET",
        "/api/inventory-transactions",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["pageInfo"]["totalElements"], 2);
}
