//! End-to-end ordering over the HTTP router

mod common;

use std::str::FromStr;
use std::time::Duration;

use common::{TestServer, WEBHOOK_SECRET};
use http::{Request, StatusCode};
use order_server::api::payments::{SIGNATURE_HEADER, sign};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::error::ErrorCode;

fn money(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

fn code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start();
    let (status, body) = server.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_diner_order_is_priced_server_side() {
    let server = TestServer::start();
    let guest = server.guest_token().await;

    let order = server.place_order(&guest).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["table_id"], server.table.id);
    assert_eq!(money(&order["subtotal"]), Decimal::new(250, 0));
    assert_eq!(money(&order["tax_amount"]), Decimal::new(25, 0));
    assert_eq!(money(&order["total"]), Decimal::new(275, 0));

    let owner = server.owner().await;
    let (status, body) = server
        .request(
            "GET",
            &format!("/api/tables/{}/order", server.table.id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], order["id"]);
}

#[tokio::test]
async fn test_menu_hides_unavailable_items_from_diners() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let (status, body) = server.request("GET", "/api/menu", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pizza", "Steak"]);

    let service = server.service().await;
    let (_, body) = server.request("GET", "/api/menu", Some(&service), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unavailable_item_reports_field_to_diner() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let (status, body) = server
        .request(
            "POST",
            "/api/orders",
            Some(&guest),
            Some(json!({ "items": [
                { "menu_item_id": "pizza", "quantity": 1 },
                { "menu_item_id": "soup", "quantity": 1 }
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), ErrorCode::ValidationFailed.code() as u64);
    assert_eq!(body["details"]["field"], "items[1]");
}

#[tokio::test]
async fn test_kitchen_lifecycle_and_role_checks() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let order = server.place_order(&guest).await;
    let id = order["id"].as_str().unwrap();

    let kitchen = server.kitchen().await;
    let service = server.service().await;

    let (status, body) = server.set_status(&kitchen, id, "confirmed").await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Service staff may not start preparation
    let (status, body) = server.set_status(&service, id, "preparing").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), ErrorCode::PermissionDenied.code() as u64);
    assert_eq!(body["details"]["capability"], "order:prepare");

    let (status, _) = server.set_status(&kitchen, id, "preparing").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.set_status(&kitchen, id, "ready").await;
    assert_eq!(status, StatusCode::OK);

    // Skipping back is not an edge of the lifecycle
    let (status, body) = server.set_status(&kitchen, id, "confirmed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), ErrorCode::InvalidTransition.code() as u64);

    let (status, body) = server.set_status(&service, id, "completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 5);

    let (_, body) = server
        .request("GET", &format!("/api/orders/{id}/timeline"), Some(&service), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    // Table is free again
    let (status, _) = server
        .request(
            "POST",
            "/api/orders",
            Some(&guest),
            Some(json!({ "items": [{ "menu_item_id": "pizza", "quantity": 2 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_stale_version_is_conflict() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let order = server.place_order(&guest).await;
    let id = order["id"].as_str().unwrap();
    let kitchen = server.kitchen().await;

    let (status, _) = server
        .request(
            "POST",
            &format!("/api/orders/{id}/notes"),
            Some(&kitchen),
            Some(json!({ "note": "allergic to nuts" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server
        .request(
            "POST",
            &format!("/api/orders/{id}/status"),
            Some(&kitchen),
            Some(json!({ "status": "confirmed", "expected_version": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), ErrorCode::StaleOrder.code() as u64);
    assert_eq!(body["details"]["current_version"], 2);
}

#[tokio::test]
async fn test_second_diner_gets_generic_busy_message() {
    let server = TestServer::start();
    let first = server.guest_token().await;
    server.place_order(&first).await;

    let second = server.guest_token().await;
    let (status, body) = server
        .request(
            "POST",
            "/api/orders",
            Some(&second),
            Some(json!({ "items": [{ "menu_item_id": "pizza", "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This table is busy, please ask a member of staff");
    assert!(body.get("details").is_none() || body["details"].is_null());
}

#[tokio::test]
async fn test_guest_cancel_window() {
    let server = TestServer::start();
    let guest = server.guest_token().await;

    let order = server.place_order(&guest).await;
    let id = order["id"].as_str().unwrap();
    server.clock.advance(Duration::from_secs(30));
    let (status, body) = server
        .request(
            "POST",
            &format!("/api/orders/{id}/cancel"),
            Some(&guest),
            Some(json!({ "reason": "ordered twice" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "cancelled");

    let order = server.place_order(&guest).await;
    let id = order["id"].as_str().unwrap();
    server.clock.advance(Duration::from_secs(180));
    let (status, _) = server
        .request(
            "POST",
            &format!("/api/orders/{id}/cancel"),
            Some(&guest),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let manager = server.manager().await;
    let (status, _) = server
        .request(
            "POST",
            &format!("/api/orders/{id}/cancel"),
            Some(&manager),
            Some(json!({ "reason": "kitchen closed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_tokens_do_not_cross_tenants() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let order = server.place_order(&guest).await;
    let id = order["id"].as_str().unwrap();

    let bistro_owner = server.login("bistro", "jean", "bistro-password").await;
    let (status, body) = server
        .request("GET", &format!("/api/orders/{id}"), Some(&bistro_owner), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), ErrorCode::TenantMismatch.code() as u64);

    // A table of one restaurant cannot be scanned under another
    let (status, _) = server
        .request(
            "POST",
            "/api/sessions/scan",
            None,
            Some(json!({ "restaurant": "bistro", "table_id": server.table.id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivated_tenant_rejects_existing_tokens() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let manager = server.manager().await;
    let owner = server.owner().await;

    let (status, _) = server
        .request("POST", "/api/tenant/deactivate", Some(&manager), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .request("POST", "/api/tenant/deactivate", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);

    let (status, _) = server.request("GET", "/api/menu", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server
        .request(
            "POST",
            "/api/sessions/scan",
            None,
            Some(json!({ "restaurant": "trattoria", "table_id": server.table.id })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_settings_update_keeps_existing_order_rates() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let order = server.place_order(&guest).await;
    let manager = server.manager().await;

    let (status, _) = server
        .request(
            "PUT",
            "/api/tenant/settings",
            Some(&manager),
            Some(json!({ "tax_rate": "0.20", "service_charge_rate": "0.05" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server
        .request(
            "GET",
            &format!("/api/orders/{}", order["id"].as_str().unwrap()),
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(money(&body["data"]["total"]), Decimal::new(275, 0));
}

#[tokio::test]
async fn test_login_failures() {
    let server = TestServer::start();
    for (restaurant, username, password) in [
        ("trattoria", "anna", "wrong-password"),
        ("trattoria", "nobody", "owner-password"),
        ("nowhere", "anna", "owner-password"),
    ] {
        let (status, body) = server
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "restaurant": restaurant, "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code(&body), ErrorCode::InvalidCredentials.code() as u64);
    }

    let (status, _) = server.request("GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = server
        .request("GET", "/api/orders", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let server = TestServer::start();
    let (_, body) = server
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "restaurant": "trattoria", "username": "marco", "password": "kitchen-password" })),
        )
        .await;
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    // A refresh token is not an access token
    let (status, _) = server.request("GET", "/api/orders", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["access_token"].as_str().unwrap();
    let (status, _) = server.request("GET", "/api/orders", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
}

async fn post_callback(server: &TestServer, body: &Value, signature: &str) -> (StatusCode, Value) {
    let raw = body.to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/payments/callback")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(axum::body::Body::from(raw))
        .unwrap();
    server.send(request).await
}

#[tokio::test]
async fn test_signed_payment_confirms_order() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let order = server.place_order(&guest).await;

    let callback = json!({
        "order_id": order["id"],
        "result": "success",
        "amount": "275.00",
    });

    let (status, _) = post_callback(&server, &callback, "deadbeef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let signature = sign(WEBHOOK_SECRET, callback.to_string().as_bytes());
    let (status, body) = post_callback(&server, &callback, &signature).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["payment_status"], "completed");

    // Redelivery changes nothing
    let (status, body) = post_callback(&server, &callback, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 2);
}

#[tokio::test]
async fn test_table_status_override() {
    let server = TestServer::start();
    let service = server.service().await;
    let uri = format!("/api/tables/{}/status", server.table.id);

    let (status, body) = server
        .request("PUT", &uri, Some(&service), Some(json!({ "status": "cleaning" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cleaning");

    let guest = server.guest_token().await;
    let (status, _) = server
        .request("PUT", &uri, Some(&guest), Some(json!({ "status": "available" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server.request("GET", "/api/tables", Some(&service), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_me_describes_guest_and_staff_callers() {
    let server = TestServer::start();

    let guest = server.guest_token().await;
    let (status, body) = server.request("GET", "/api/auth/me", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let me = &body["data"];
    assert_eq!(me["kind"], "guest");
    assert_eq!(me["tenant_id"], server.tenant.id);
    assert_eq!(me["restaurant"], "Trattoria Roma");
    assert_eq!(me["table_id"], server.table.id);
    assert!(me["session_id"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(
        me["capabilities"],
        json!(["menu:read", "order:create", "order:read-own-table"])
    );
    assert!(me.get("role").is_none());

    let kitchen = server.kitchen().await;
    let (status, body) = server.request("GET", "/api/auth/profile", Some(&kitchen), None).await;
    assert_eq!(status, StatusCode::OK);
    let me = &body["data"];
    assert_eq!(me["kind"], "staff");
    assert_eq!(me["role"], "kitchen");
    assert!(me["staff_id"].as_str().is_some());
    assert!(me.get("table_id").is_none());
    let capabilities: Vec<&str> = me["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert!(capabilities.contains(&"order:prepare"));
    assert!(!capabilities.contains(&"order:cancel"));

    let (status, _) = server.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
