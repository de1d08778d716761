//! Error types and API response structures

use super::category::ErrorClass;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type crossing the API boundary, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level validation info, ids)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Handling class of this error
    pub fn class(&self) -> ErrorClass {
        self.code.class()
    }

    /// Replace code and message with the generic guest-facing variant
    ///
    /// Details are dropped: they may carry ids of other orders or staff.
    pub fn redacted_for_guest(self) -> Self {
        let class = self.class();
        Self {
            code: class.guest_code(),
            message: class.guest_message().to_string(),
            details: None,
        }
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Create a tenant isolation error
    pub fn tenant_mismatch(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TenantMismatch, msg)
    }
}

/// Response envelope of every API endpoint
///
/// `{"code": 0, "message": "OK", "data": ...}` on success,
/// `{"code": 4011, "message": ..., "details": {...}}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 0 on success, an [`ErrorCode`] value otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// Failure envelope carrying the code, message and details of `err`
    pub fn failure(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        match self.class() {
            ErrorClass::System => {
                tracing::error!(code = %self.code, message = %self.message, "System error");
            }
            ErrorClass::Conflict => {
                tracing::debug!(code = %self.code, message = %self.message, "Conflict returned");
            }
            _ => {}
        }
        (status, axum::Json(ApiResponse::<()>::failure(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Unknown menu item")
            .with_detail("field", "items[1].menu_item_id")
            .with_detail("reason", "not_found");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "items[1].menu_item_id");
        assert_eq!(details.get("reason").unwrap(), "not_found");
    }

    #[test]
    fn test_redacted_for_guest_hides_internal_code() {
        let err = AppError::with_message(ErrorCode::StaleOrder, "order o-1 version 3 != 4")
            .with_detail("order_id", "o-1");
        let redacted = err.redacted_for_guest();

        assert_eq!(redacted.code, ErrorCode::TableOccupied);
        assert_eq!(
            redacted.message,
            "This table is busy, please ask a member of staff"
        );
        assert!(redacted.details.is_none());
    }

    #[test]
    fn test_redacted_isolation_does_not_leak_tenant() {
        let err = AppError::tenant_mismatch("order belongs to tenant t-2");
        let redacted = err.redacted_for_guest();
        assert_eq!(redacted.code, ErrorCode::PermissionDenied);
        assert!(!redacted.message.contains("t-2"));
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order o-9 not found")
            .with_detail("id", "o-9");
        let response = ApiResponse::<()>::failure(err);

        assert_eq!(response.code, Some(4001));
        assert_eq!(response.message, "Order o-9 not found");
        assert!(response.data.is_none());
        assert!(response.details.is_some());
    }

    #[test]
    fn test_api_response_serialize() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":0"));
        assert!(json.contains("\"message\":\"OK\""));
        assert!(json.contains("\"data\":\"hello\""));
    }
}
