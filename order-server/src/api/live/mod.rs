//! Live event feed over WebSocket
//!
//! `GET /api/live?scope=table|tenant&table_id=..`
//!
//! Browsers cannot set headers on a WebSocket handshake, so the token may
//! also come as the `access_token` query parameter. The subscription is
//! authorized before the upgrade; a refused subscription is a plain HTTP
//! error.
//!
//! Each committed change arrives as one JSON text frame holding a
//! [`shared::order::DomainEvent`]. Delivery is best effort: after a gap the
//! client re-fetches the order.

use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::AppError;

use super::for_caller;
use crate::auth::{AccessContext, JwtService};
use crate::core::ServerState;
use crate::message::{Subscription, SubscriptionScope};
use crate::security_log;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/live", get(live))
}

#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    #[default]
    Table,
    Tenant,
}

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    #[serde(default)]
    pub scope: ScopeKind,
    /// Defaults to the table of an anonymous token
    pub table_id: Option<String>,
    pub access_token: Option<String>,
}

async fn live(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<LiveQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let ctx = authenticate(&state, &headers, query.access_token.as_deref())?;
    let scope = match query.scope {
        ScopeKind::Tenant => SubscriptionScope::Tenant {
            tenant_id: ctx.tenant_id().to_string(),
        },
        ScopeKind::Table => {
            let table_id = query
                .table_id
                .or_else(|| ctx.table_id().map(str::to_string))
                .ok_or_else(|| AppError::validation("table_id is required"))?;
            SubscriptionScope::Table {
                tenant_id: ctx.tenant_id().to_string(),
                table_id,
            }
        }
    };

    let subscription = state
        .bus
        .subscribe(&ctx, scope)
        .map_err(|e| for_caller(&ctx)(e.into()))?;
    tracing::debug!(
        tenant_id = %ctx.tenant_id(),
        actor = %ctx.actor_ref(),
        scope = ?subscription.scope(),
        "Live subscription opened"
    );

    Ok(ws.on_upgrade(move |socket| forward_events(socket, subscription)))
}

fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    query_token: Option<&str>,
) -> Result<AccessContext, AppError> {
    let header_token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);
    let Some(token) = header_token.or(query_token) else {
        security_log!("WARN", "auth_missing", uri = "/api/live".to_string());
        return Err(AppError::not_authenticated());
    };
    state.resolver.authenticate(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = "/api/live".to_string()
        );
        e.into()
    })
}

/// Pump events into the socket until either side goes away
async fn forward_events(socket: WebSocket, mut subscription: Subscription) {
    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else {
                    // Bus shut down or channel dropped
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode event");
                        continue;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Clients only listen; pings are answered by axum
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    tracing::debug!(scope = ?subscription.scope(), "Live subscription closed");
}
