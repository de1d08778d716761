//! Live feed delivery for changes made through the HTTP surface

mod common;

use std::time::Duration;

use common::TestServer;
use order_server::message::SubscriptionScope;
use shared::order::{EventPayload, OrderStatus};

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_diner_follows_own_table() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let ctx = server.state.resolver.authenticate(&guest).unwrap();

    let mut feed = server
        .state
        .bus
        .subscribe(
            &ctx,
            SubscriptionScope::Table {
                tenant_id: server.tenant.id.clone(),
                table_id: server.table.id.clone(),
            },
        )
        .unwrap();

    let order = server.place_order(&guest).await;
    let kitchen = server.kitchen().await;
    server
        .set_status(&kitchen, order["id"].as_str().unwrap(), "confirmed")
        .await;

    let mut created = false;
    let mut confirmed = false;
    while !(created && confirmed) {
        let event = tokio::time::timeout(WAIT, feed.recv())
            .await
            .expect("event expected")
            .unwrap();
        assert_eq!(event.table_id, server.table.id);
        match event.payload {
            EventPayload::OrderCreated { order } => {
                assert_eq!(order.status, OrderStatus::Pending);
                created = true;
            }
            EventPayload::StatusChanged { from, to, .. } => {
                assert_eq!((from, to), (OrderStatus::Pending, OrderStatus::Confirmed));
                assert_eq!(event.sequence, 2);
                confirmed = true;
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_diner_cannot_follow_other_table_or_tenant() {
    let server = TestServer::start();
    let guest = server.guest_token().await;
    let ctx = server.state.resolver.authenticate(&guest).unwrap();
    let other = server
        .state
        .directory
        .list_tables(&server.tenant.id)
        .unwrap()
        .into_iter()
        .find(|t| t.number == 6)
        .unwrap();

    assert!(
        server
            .state
            .bus
            .subscribe(
                &ctx,
                SubscriptionScope::Table {
                    tenant_id: server.tenant.id.clone(),
                    table_id: other.id,
                },
            )
            .is_err()
    );
    assert!(
        server
            .state
            .bus
            .subscribe(
                &ctx,
                SubscriptionScope::Tenant {
                    tenant_id: server.tenant.id.clone(),
                },
            )
            .is_err()
    );
}

#[tokio::test]
async fn test_tenant_feed_is_isolated() {
    let server = TestServer::start();
    let bistro = server.tenant_by_slug("bistro");
    let jean = server.login("bistro", "jean", "bistro-password").await;
    let ctx = server.state.resolver.authenticate(&jean).unwrap();

    assert!(
        server
            .state
            .bus
            .subscribe(
                &ctx,
                SubscriptionScope::Tenant {
                    tenant_id: server.tenant.id.clone(),
                },
            )
            .is_err()
    );

    let mut feed = server
        .state
        .bus
        .subscribe(&ctx, SubscriptionScope::Tenant { tenant_id: bistro.id })
        .unwrap();

    let guest = server.guest_token().await;
    server.place_order(&guest).await;

    let nothing = tokio::time::timeout(Duration::from_millis(200), feed.recv()).await;
    assert!(nothing.is_err(), "trattoria events must not reach bistro");
}
