//! Error category and class classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Tenant errors
/// - 4xxx: Order errors
/// - 5xxx: Payment errors
/// - 6xxx: Menu item errors
/// - 7xxx: Table errors
/// - 8xxx: Staff errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Tenant errors (3xxx)
    Tenant,
    /// Order errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Menu item errors (6xxx)
    MenuItem,
    /// Table errors (7xxx)
    Table,
    /// Staff errors (8xxx)
    Staff,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Tenant,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::MenuItem,
            7000..8000 => Self::Table,
            8000..9000 => Self::Staff,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Tenant => "tenant",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::MenuItem => "menu_item",
            Self::Table => "table",
            Self::Staff => "staff",
            Self::System => "system",
        }
    }
}

/// Handling class of an error
///
/// Categories group codes by domain; classes group them by how callers must
/// react. Only [`ErrorClass::Conflict`] is ever retried, and only once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Bad, expired or forged token; bad credentials
    Authentication,
    /// Valid identity without the required capability
    Authorization,
    /// Malformed input or unknown referenced entities
    Validation,
    /// Stale version, occupied table, capacity reached
    Conflict,
    /// Resource belongs to a different tenant than the caller
    TenantIsolation,
    /// Resource does not exist
    NotFound,
    /// Persistence or internal failure
    System,
}

impl ErrorClass {
    /// Whether the lifecycle engine may retry an operation failing with this class
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// Message shown to guests (anonymous table sessions)
    ///
    /// Guests never see internal codes; staff get the precise code instead.
    pub fn guest_message(&self) -> &'static str {
        match self {
            Self::Authentication => "Please scan the table code again",
            Self::Authorization => "Please ask a member of staff for help",
            Self::Validation => "Some items in your order could not be accepted",
            Self::Conflict => "This table is busy, please ask a member of staff",
            Self::TenantIsolation => "This code does not belong to this restaurant",
            Self::NotFound => "We could not find what you were looking for",
            Self::System => "Something went wrong, please try again",
        }
    }

    /// Generic code used when redacting an error for guests
    pub fn guest_code(&self) -> ErrorCode {
        match self {
            Self::Authentication => ErrorCode::NotAuthenticated,
            Self::Authorization => ErrorCode::PermissionDenied,
            Self::Validation => ErrorCode::ValidationFailed,
            Self::Conflict => ErrorCode::TableOccupied,
            Self::TenantIsolation => ErrorCode::PermissionDenied,
            Self::NotFound => ErrorCode::NotFound,
            Self::System => ErrorCode::InternalError,
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Get the handling class for this error code
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled
            | Self::PaymentSignatureInvalid => ErrorClass::Authentication,

            Self::PermissionDenied
            | Self::RoleRequired
            | Self::CancelWindowExpired
            | Self::TenantInactive => ErrorClass::Authorization,

            Self::TenantMismatch => ErrorClass::TenantIsolation,

            Self::StaleOrder
            | Self::TableOccupied
            | Self::TenantAtCapacity
            | Self::AlreadyExists
            | Self::TenantSlugExists
            | Self::StaffUsernameExists
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled => ErrorClass::Conflict,

            Self::NotFound
            | Self::TenantNotFound
            | Self::OrderNotFound
            | Self::TableNotFound
            | Self::StaffNotFound => ErrorClass::NotFound,

            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::TimeoutError
            | Self::ConfigError
            | Self::StorageFull
            | Self::StorageCorrupted
            | Self::SystemBusy => ErrorClass::System,

            // Success never reaches an error path
            Self::Success
            | Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::OrderEmpty
            | Self::InvalidTransition
            | Self::PaymentRequired
            | Self::PaymentFailed
            | Self::PaymentAmountMismatch
            | Self::MenuItemNotFound
            | Self::MenuItemInvalidPrice
            | Self::MenuItemUnavailable
            | Self::CustomizationNotFound
            | Self::InvalidQuantity => ErrorClass::Validation,
        }
    }
}
