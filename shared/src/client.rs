//! Client-related types shared between server and UI clients
//!
//! Request/response types used in API communication.

use crate::models::{StaffInfo, StaffRole, TableStatus};
use crate::order::{OrderStatus, PaymentResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// Session / Auth API DTOs
// =============================================================================

/// QR scan: restaurant slug (or id) and table id printed in the code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(length(min = 1, max = 100))]
    pub restaurant: String,
    #[validate(length(min = 1, max = 100))]
    pub table_id: String,
}

/// Anonymous table token issued for a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub token: String,
    pub tenant_id: String,
    pub table_id: String,
    pub table_number: u32,
    pub session_id: String,
    /// Unix seconds
    pub expires_at: i64,
}

/// Staff login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub restaurant: String,
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Staff login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry, Unix seconds
    pub expires_at: i64,
    pub staff: StaffInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_at: i64,
}

/// Caller described by the presented access token (`GET /api/auth/me`)
///
/// `capabilities` lists the policy capabilities the caller holds right now,
/// so clients can hide actions that would be refused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentActor {
    Guest {
        tenant_id: String,
        restaurant: String,
        table_id: String,
        session_id: String,
        capabilities: Vec<String>,
    },
    Staff {
        tenant_id: String,
        restaurant: String,
        staff_id: String,
        role: StaffRole,
        permissions: Vec<String>,
        capabilities: Vec<String>,
    },
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Order line as submitted by a client (no prices: they are computed server-side)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    #[validate(length(min = 1))]
    pub menu_item_id: String,
    #[validate(range(min = 1, max = 99))]
    pub quantity: u32,
    #[serde(default)]
    pub customizations: Vec<String>,
}

/// Create order request
///
/// `table_id` is required for staff; guests order for the table in their token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub table_id: Option<String>,
    #[validate(length(min = 1, max = 50), nested)]
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub special_instructions: Option<String>,
}

/// Status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
    /// Version the caller last saw; mismatch fails with a conflict
    #[serde(default)]
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteRequest {
    #[validate(length(min = 1, max = 500))]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusRequest {
    pub status: TableStatus,
}

// =============================================================================
// Payment API DTOs
// =============================================================================

/// Asynchronous callback delivered by the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentCallback {
    #[validate(length(min = 1))]
    pub order_id: String,
    pub result: PaymentResult,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_validation() {
        let req: CreateOrderRequest = serde_json::from_str(
            r#"{"items":[{"menu_item_id":"burger","quantity":2}],"special_instructions":"no onions"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.items[0].customizations.is_empty());
        assert!(req.table_id.is_none());

        let empty = CreateOrderRequest {
            table_id: None,
            items: vec![],
            special_instructions: None,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_nested_quantity_validation() {
        let req = CreateOrderRequest {
            table_id: Some("t5".into()),
            items: vec![OrderItemRequest {
                menu_item_id: "burger".into(),
                quantity: 0,
                customizations: vec![],
            }],
            special_instructions: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn test_transition_request_optional_version() {
        let req: TransitionRequest = serde_json::from_str(r#"{"status":"confirmed"}"#).unwrap();
        assert_eq!(req.status, OrderStatus::Confirmed);
        assert!(req.expected_version.is_none());
    }
}
