//! Domain events - committed state changes pushed to live subscribers

use super::types::{ActorRef, Order, OrderStatus, PaymentStatus};
use crate::models::TableStatus;
use serde::{Deserialize, Serialize};

/// Domain event
///
/// Published after the write that produced it has committed. The persisted
/// state is authoritative; a subscriber that misses an event re-fetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainEvent {
    pub tenant_id: String,
    pub table_id: String,
    /// None for table-level events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Version of the order (or table) after the change.
    /// Monotonic per stream, see [`DomainEvent::stream_key`].
    pub sequence: u64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: EventPayload,
}

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderCreated {
        order: Box<Order>,
    },
    StatusChanged {
        from: OrderStatus,
        to: OrderStatus,
        actor: ActorRef,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    PaymentUpdated {
        payment_status: PaymentStatus,
        status: OrderStatus,
    },
    NoteAdded {
        staff_id: String,
        note: String,
    },
    TableStatusChanged {
        status: TableStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_order_id: Option<String>,
    },
}

impl EventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::OrderCreated { .. } => "ORDER_CREATED",
            EventPayload::StatusChanged { .. } => "STATUS_CHANGED",
            EventPayload::PaymentUpdated { .. } => "PAYMENT_UPDATED",
            EventPayload::NoteAdded { .. } => "NOTE_ADDED",
            EventPayload::TableStatusChanged { .. } => "TABLE_STATUS_CHANGED",
        }
    }
}

/// Ordering stream of an event: one per order, one per table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamKey {
    Order(String),
    Table(String),
}

impl DomainEvent {
    pub fn stream_key(&self) -> StreamKey {
        match &self.order_id {
            Some(id) => StreamKey::Order(id.clone()),
            None => StreamKey::Table(self.table_id.clone()),
        }
    }
}
