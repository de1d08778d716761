//! Unified error codes for the ordering platform
//!
//! Error codes are shared by the order server, the diner web app and the
//! staff dashboards. They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu item errors
//! - 7xxx: Table errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, Dart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid (malformed, forged or wrong kind)
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Diner self-cancel window has elapsed
    CancelWindowExpired = 2010,

    // ==================== 3xxx: Tenant ====================
    /// Tenant not found
    TenantNotFound = 3002,
    /// Tenant is deactivated
    TenantInactive = 3030,
    /// Resource belongs to another tenant
    TenantMismatch = 3031,
    /// Tenant slug already taken
    TenantSlugExists = 3032,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order is empty
    OrderEmpty = 4007,
    /// Transition not allowed by the order state machine
    InvalidTransition = 4010,
    /// Order was modified concurrently
    StaleOrder = 4011,
    /// Payment must complete before confirmation
    PaymentRequired = 4012,
    /// Tenant reached its concurrent order limit
    TenantAtCapacity = 4013,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Payment amount does not match the order total
    PaymentAmountMismatch = 5006,
    /// Payment callback signature invalid
    PaymentSignatureInvalid = 5007,

    // ==================== 6xxx: Menu item ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu item is currently unavailable
    MenuItemUnavailable = 6003,
    /// Customization option not offered by the item
    CustomizationNotFound = 6004,
    /// Quantity out of range
    InvalidQuantity = 6005,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Staff username already exists
    StaffUsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Caller is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::CancelWindowExpired => "Order can no longer be cancelled by the guest",

            // Tenant
            ErrorCode::TenantNotFound => "Restaurant not found",
            ErrorCode::TenantInactive => "Restaurant is not active",
            ErrorCode::TenantMismatch => "Resource belongs to another restaurant",
            ErrorCode::TenantSlugExists => "Restaurant slug already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidTransition => "Order status transition is not allowed",
            ErrorCode::StaleOrder => "Order was modified concurrently",
            ErrorCode::PaymentRequired => "Payment must be completed before confirmation",
            ErrorCode::TenantAtCapacity => "Restaurant is at its concurrent order limit",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentAmountMismatch => "Payment amount does not match order total",
            ErrorCode::PaymentSignatureInvalid => "Payment callback signature is invalid",

            // Menu item
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemUnavailable => "Menu item is unavailable",
            ErrorCode::CustomizationNotFound => "Customization option not found",
            ErrorCode::InvalidQuantity => "Quantity is out of range",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffUsernameExists => "Staff username already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",

            // Storage
            ErrorCode::StorageFull => "Storage full (disk space insufficient)",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2010 => Ok(ErrorCode::CancelWindowExpired),

            // Tenant
            3002 => Ok(ErrorCode::TenantNotFound),
            3030 => Ok(ErrorCode::TenantInactive),
            3031 => Ok(ErrorCode::TenantMismatch),
            3032 => Ok(ErrorCode::TenantSlugExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4007 => Ok(ErrorCode::OrderEmpty),
            4010 => Ok(ErrorCode::InvalidTransition),
            4011 => Ok(ErrorCode::StaleOrder),
            4012 => Ok(ErrorCode::PaymentRequired),
            4013 => Ok(ErrorCode::TenantAtCapacity),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5006 => Ok(ErrorCode::PaymentAmountMismatch),
            5007 => Ok(ErrorCode::PaymentSignatureInvalid),

            // Menu item
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6003 => Ok(ErrorCode::MenuItemUnavailable),
            6004 => Ok(ErrorCode::CustomizationNotFound),
            6005 => Ok(ErrorCode::InvalidQuantity),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::StaffUsernameExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageFull),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
