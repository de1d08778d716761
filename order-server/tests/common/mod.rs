//! Shared fixtures: an in-memory server seeded with one restaurant
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use order_server::api::build_app;
use order_server::core::seed::{SeedFile, apply_seed};
use order_server::utils::ManualClock;
use order_server::{Config, ServerState};
use serde_json::{Value, json};
use shared::models::{Table, Tenant};
use tower::ServiceExt;

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const START_MILLIS: i64 = 1_700_000_000_000;

pub struct TestServer {
    pub state: ServerState,
    pub app: Router,
    pub clock: Arc<ManualClock>,
    pub tenant: Tenant,
    pub table: Table,
}

fn seed() -> SeedFile {
    serde_json::from_value(json!({
        "tenants": [
            {
                "slug": "trattoria",
                "name": "Trattoria Roma",
                "settings": { "tax_rate": "0.10" },
                "tables": [5, 6],
                "staff": [
                    { "username": "anna", "display_name": "Anna", "password": "owner-password", "role": "owner" },
                    { "username": "luca", "display_name": "Luca", "password": "manager-password", "role": "manager" },
                    { "username": "marco", "display_name": "Marco", "password": "kitchen-password", "role": "kitchen" },
                    { "username": "sofia", "display_name": "Sofia", "password": "service-password", "role": "service" }
                ],
                "menu": [
                    { "id": "pizza", "name": "Pizza", "price": "100" },
                    { "id": "steak", "name": "Steak", "price": "150" },
                    { "id": "soup", "name": "Soup", "price": "6", "available": false }
                ]
            },
            {
                "slug": "bistro",
                "name": "Bistro Paris",
                "tables": [1],
                "staff": [
                    { "username": "jean", "display_name": "Jean", "password": "bistro-password", "role": "owner" }
                ],
                "menu": [
                    { "id": "pizza", "name": "Pizza", "price": "12" }
                ]
            }
        ]
    }))
    .unwrap()
}

impl TestServer {
    pub fn start() -> Self {
        let mut config = Config::for_work_dir("unused");
        config.payment_webhook_secret = Some(WEBHOOK_SECRET.to_string());
        let clock = Arc::new(ManualClock::new(START_MILLIS));
        let state = ServerState::in_memory(config, clock.clone()).unwrap();
        apply_seed(&seed(), &state.directory, &state.catalog).unwrap();

        let tenant = state.directory.get_by_slug("trattoria").unwrap().unwrap();
        let table = state
            .directory
            .list_tables(&tenant.id)
            .unwrap()
            .into_iter()
            .find(|t| t.number == 5)
            .unwrap();
        let app = build_app(&state);
        Self {
            state,
            app,
            clock,
            tenant,
            table,
        }
    }

    pub fn tenant_by_slug(&self, slug: &str) -> Tenant {
        self.state.directory.get_by_slug(slug).unwrap().unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Scan the QR code of `table_id` at `restaurant`, returning the table token
    pub async fn scan(&self, restaurant: &str, table_id: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/sessions/scan",
                None,
                Some(json!({ "restaurant": restaurant, "table_id": table_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "scan failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn guest_token(&self) -> String {
        self.scan("trattoria", &self.table.id).await
    }

    pub async fn login(&self, restaurant: &str, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({
                    "restaurant": restaurant,
                    "username": username,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    pub async fn owner(&self) -> String {
        self.login("trattoria", "anna", "owner-password").await
    }

    pub async fn manager(&self) -> String {
        self.login("trattoria", "luca", "manager-password").await
    }

    pub async fn kitchen(&self) -> String {
        self.login("trattoria", "marco", "kitchen-password").await
    }

    pub async fn service(&self) -> String {
        self.login("trattoria", "sofia", "service-password").await
    }

    /// Place pizza + steak as a diner, returning the order JSON
    pub async fn place_order(&self, guest: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/orders",
                Some(guest),
                Some(json!({
                    "items": [
                        { "menu_item_id": "pizza", "quantity": 1 },
                        { "menu_item_id": "steak", "quantity": 1 }
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "order failed: {body}");
        body["data"].clone()
    }

    pub async fn set_status(&self, token: &str, order_id: &str, status: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/orders/{order_id}/status"),
            Some(token),
            Some(json!({ "status": status })),
        )
        .await
    }
}
