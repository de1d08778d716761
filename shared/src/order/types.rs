//! Order domain types

use crate::models::StaffRole;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Status
// ============================================================================

/// Order status
///
/// `pending → confirmed → preparing → ready → completed`, plus
/// `* → cancelled` from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Terminal statuses accept no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Outcome reported by the payment gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentResult {
    Success,
    Failure,
}

// ============================================================================
// Actors
// ============================================================================

/// Who performed a state change (snapshot for the timeline)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActorRef {
    /// Diner session holding an anonymous table token
    Guest { table_id: String, session_id: String },
    Staff { staff_id: String, role: StaffRole },
    PaymentGateway,
}

impl std::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRef::Guest { table_id, .. } => write!(f, "guest@{table_id}"),
            ActorRef::Staff { staff_id, role } => write!(f, "{role}:{staff_id}"),
            ActorRef::PaymentGateway => f.write_str("payment-gateway"),
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// Customization chosen for a line, with its price snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChosenCustomization {
    pub id: String,
    pub name: String,
    pub price_delta: Decimal,
}

/// Order line, priced server-side at creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub menu_item_id: String,
    /// Name snapshot
    pub name: String,
    pub quantity: u32,
    /// Catalog price plus customization deltas
    pub unit_price: Decimal,
    #[serde(default)]
    pub customizations: Vec<ChosenCustomization>,
    /// unit_price × quantity
    pub line_total: Decimal,
}

/// Staff annotation on an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffNote {
    pub staff_id: String,
    pub note: String,
    pub created_at: i64,
}

/// Order
///
/// Lines, amounts and the rate snapshot are immutable after creation.
/// Only `status`, `payment_status`, `notes` and `cancel_reason` change,
/// each change bumping `version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    pub table_id: String,
    /// Anonymous session that placed the order (None when placed by staff)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub service_charge: Decimal,
    pub total: Decimal,
    /// Tenant tax rate captured at creation
    pub tax_rate: Decimal,
    /// Tenant service-charge rate captured at creation
    pub service_charge_rate: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub estimated_prep_minutes: u32,
    #[serde(default)]
    pub notes: Vec<StaffNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Optimistic concurrency version, starts at 1
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Timeline entry recorded for every status or payment change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub order_id: String,
    /// Order version after this change
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<OrderStatus>,
    pub to: OrderStatus,
    pub actor: ActorRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: i64,
}
