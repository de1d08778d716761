use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::StorageError;

/// Why a submitted line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidItemReason {
    UnknownItem,
    Unavailable,
    UnknownCustomization(String),
    InvalidQuantity(u32),
}

/// Order engine errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid item {menu_item_id} at line {index}: {reason:?}")]
    InvalidItem {
        index: usize,
        menu_item_id: String,
        reason: InvalidItemReason,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Tenant is deactivated: {0}")]
    TenantInactive(String),

    #[error("Table {table_id} already has active order {order_id}")]
    TableOccupied { table_id: String, order_id: String },

    #[error("Tenant reached its limit of {limit} active orders")]
    TenantAtCapacity { limit: u32 },

    #[error("Transition {from} -> {to} is not allowed")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {order_id} is already {status}")]
    AlreadyTerminal {
        order_id: String,
        status: OrderStatus,
    },

    #[error("Order {order_id} changed concurrently (expected v{expected}, found v{actual})")]
    StaleOrder {
        order_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Guest cancellation window expired for order {0}")]
    CancelWindowExpired(String),

    #[error("Order {0} must be paid before confirmation")]
    PaymentRequired(String),

    #[error("Payment amount {received} does not match order total {expected}")]
    PaymentAmountMismatch { expected: Decimal, received: Decimal },

    #[error("Payment reported for cancelled order {0}")]
    PaymentOnCancelled(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OrderError {
    /// Stale version or contended table/tenant capacity
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            OrderError::StaleOrder { .. }
                | OrderError::TableOccupied { .. }
                | OrderError::TenantAtCapacity { .. }
                | OrderError::AlreadyTerminal { .. }
                | OrderError::PaymentOnCancelled(_)
        )
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidItem {
                index,
                menu_item_id,
                reason,
            } => {
                let (code, message) = match &reason {
                    InvalidItemReason::UnknownItem => (
                        ErrorCode::MenuItemNotFound,
                        format!("Menu item {menu_item_id} does not exist"),
                    ),
                    InvalidItemReason::Unavailable => (
                        ErrorCode::MenuItemUnavailable,
                        format!("Menu item {menu_item_id} is not available"),
                    ),
                    InvalidItemReason::UnknownCustomization(c) => (
                        ErrorCode::CustomizationNotFound,
                        format!("Customization {c} is not offered for {menu_item_id}"),
                    ),
                    InvalidItemReason::InvalidQuantity(q) => (
                        ErrorCode::InvalidQuantity,
                        format!("Quantity {q} is not allowed"),
                    ),
                };
                AppError::with_message(code, message)
                    .with_detail("field", format!("items[{index}]"))
                    .with_detail("menu_item_id", menu_item_id)
            }
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            OrderError::TableNotFound(id) => {
                AppError::new(ErrorCode::TableNotFound).with_detail("table_id", id)
            }
            OrderError::TenantNotFound(id) => {
                AppError::new(ErrorCode::TenantNotFound).with_detail("tenant_id", id)
            }
            OrderError::TenantInactive(id) => {
                AppError::new(ErrorCode::TenantInactive).with_detail("tenant_id", id)
            }
            OrderError::TableOccupied { table_id, order_id } => {
                AppError::new(ErrorCode::TableOccupied)
                    .with_detail("table_id", table_id)
                    .with_detail("order_id", order_id)
            }
            OrderError::TenantAtCapacity { limit } => {
                AppError::new(ErrorCode::TenantAtCapacity).with_detail("limit", limit)
            }
            OrderError::InvalidTransition { from, to } => AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot move an order from {from} to {to}"),
            )
            .with_detail("from", from.as_str())
            .with_detail("to", to.as_str()),
            OrderError::AlreadyTerminal { order_id, status } => {
                let code = if status == OrderStatus::Cancelled {
                    ErrorCode::OrderAlreadyCancelled
                } else {
                    ErrorCode::OrderAlreadyCompleted
                };
                AppError::new(code).with_detail("order_id", order_id)
            }
            OrderError::StaleOrder {
                order_id,
                expected,
                actual,
            } => AppError::new(ErrorCode::StaleOrder)
                .with_detail("order_id", order_id)
                .with_detail("expected_version", expected)
                .with_detail("current_version", actual),
            OrderError::CancelWindowExpired(id) => {
                AppError::new(ErrorCode::CancelWindowExpired).with_detail("order_id", id)
            }
            OrderError::PaymentRequired(id) => {
                AppError::new(ErrorCode::PaymentRequired).with_detail("order_id", id)
            }
            OrderError::PaymentAmountMismatch { expected, received } => {
                AppError::new(ErrorCode::PaymentAmountMismatch)
                    .with_detail("expected", expected.to_string())
                    .with_detail("received", received.to_string())
            }
            OrderError::PaymentOnCancelled(id) => {
                AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("order_id", id)
            }
            OrderError::Auth(e) => e.into(),
            OrderError::Storage(e) => e.into(),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
