//! Event fan-out hub
//!
//! # Architecture
//!
//! ```text
//! OrdersManager ──▶ publish(event) ──▶ channels[tenant_id] ──┬──▶ Subscription (table scope)
//!                     (never blocks)    broadcast::Sender     ├──▶ Subscription (tenant scope)
//!                                                             └──▶ ...
//! ```
//!
//! One broadcast channel per tenant, created lazily by the first subscriber
//! and dropped once the last subscriber is gone. A tenant's events never
//! enter another tenant's channel. Each [`Subscription`] filters its
//! tenant's channel down to its scope and drops events older than one it has
//! already delivered for the same order or table.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use shared::order::{DomainEvent, StreamKey};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::auth::capability::{ORDER_READ, ORDER_READ_OWN_TABLE};
use crate::auth::{AccessContext, AuthError};

/// Default per-tenant channel capacity
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// What a subscriber wants to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionScope {
    /// Orders and status of one table (diner view)
    Table { tenant_id: String, table_id: String },
    /// Every order of a tenant (kitchen display, dashboard)
    Tenant { tenant_id: String },
}

impl SubscriptionScope {
    pub fn tenant_id(&self) -> &str {
        match self {
            SubscriptionScope::Table { tenant_id, .. } | SubscriptionScope::Tenant { tenant_id } => {
                tenant_id
            }
        }
    }

    fn matches(&self, event: &DomainEvent) -> bool {
        match self {
            SubscriptionScope::Table {
                tenant_id,
                table_id,
            } => event.tenant_id == *tenant_id && event.table_id == *table_id,
            SubscriptionScope::Tenant { tenant_id } => event.tenant_id == *tenant_id,
        }
    }
}

/// Per-tenant broadcast hub
#[derive(Debug, Clone)]
pub struct MessageBus {
    channels: Arc<DashMap<String, broadcast::Sender<DomainEvent>>>,
    capacity: usize,
    shutdown_token: CancellationToken,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Publish a committed event (best effort, never blocks)
    ///
    /// A tenant without subscribers is a logged no-op: the persisted order is
    /// the source of truth and subscribers re-fetch it.
    pub fn publish(&self, event: DomainEvent) {
        let tenant_id = event.tenant_id.clone();
        let Some(sender) = self.channels.get(&tenant_id).map(|s| s.clone()) else {
            tracing::trace!(
                tenant_id = %tenant_id,
                event = event.payload.name(),
                "No subscribers, event dropped"
            );
            return;
        };

        match sender.send(event) {
            Ok(receivers) => {
                tracing::trace!(tenant_id = %tenant_id, receivers, "Event published");
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(
                    tenant_id = %tenant_id,
                    event = event.payload.name(),
                    "All subscribers gone, event dropped"
                );
                self.channels
                    .remove_if(&tenant_id, |_, tx| tx.receiver_count() == 0);
            }
        }
    }

    /// Open a live feed for `scope`
    ///
    /// Guests may only follow their own table; the whole-tenant feed needs
    /// `order:read`. A scope of another tenant is an isolation violation.
    pub fn subscribe(
        &self,
        ctx: &AccessContext,
        scope: SubscriptionScope,
    ) -> Result<Subscription, AuthError> {
        ctx.ensure_tenant(scope.tenant_id(), "subscription")?;
        match &scope {
            SubscriptionScope::Table { table_id, .. } => {
                ctx.require(ORDER_READ_OWN_TABLE)?;
                if let Some(own_table) = ctx.table_id()
                    && own_table != table_id
                {
                    return Err(AuthError::Denied {
                        actor: ctx.actor_ref().to_string(),
                        capability: ORDER_READ_OWN_TABLE.to_string(),
                    });
                }
            }
            SubscriptionScope::Tenant { .. } => ctx.require(ORDER_READ)?,
        }

        let receiver = self
            .channels
            .entry(scope.tenant_id().to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        tracing::debug!(tenant_id = %ctx.tenant_id(), scope = ?scope, "Live subscription opened");
        Ok(Subscription {
            receiver,
            scope,
            last_sequence: HashMap::new(),
            shutdown_token: self.shutdown_token.clone(),
        })
    }

    /// Number of tenants with a live channel
    pub fn active_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// End every subscription
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
        self.channels.clear();
    }
}

/// Live feed of one scope
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<DomainEvent>,
    scope: SubscriptionScope,
    last_sequence: HashMap<StreamKey, u64>,
    shutdown_token: CancellationToken,
}

impl Subscription {
    pub fn scope(&self) -> &SubscriptionScope {
        &self.scope
    }

    /// Next event of this scope, `None` once the hub shuts down
    ///
    /// Per order (and per table) events arrive in commit order; an event not
    /// newer than the last one delivered for its stream is dropped.
    pub async fn recv(&mut self) -> Option<DomainEvent> {
        loop {
            let result = tokio::select! {
                _ = self.shutdown_token.cancelled() => return None,
                result = self.receiver.recv() => result,
            };
            match result {
                Ok(event) => {
                    if let Some(event) = self.accept(event) {
                        return Some(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        scope = ?self.scope,
                        skipped,
                        "Live subscriber lagged, events skipped"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn accept(&mut self, event: DomainEvent) -> Option<DomainEvent> {
        if !self.scope.matches(&event) {
            return None;
        }
        let key = event.stream_key();
        if let Some(last) = self.last_sequence.get(&key)
            && event.sequence <= *last
        {
            tracing::debug!(
                stream = ?key,
                sequence = event.sequence,
                last = *last,
                "Stale event dropped"
            );
            return None;
        }
        self.last_sequence.insert(key, event.sequence);
        Some(event)
    }
}
