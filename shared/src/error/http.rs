//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TenantNotFound
            | Self::OrderNotFound
            | Self::TableNotFound
            | Self::StaffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::TenantSlugExists
            | Self::StaffUsernameExists
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled
            | Self::StaleOrder
            | Self::TableOccupied
            | Self::TenantAtCapacity => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled
            | Self::PaymentSignatureInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::CancelWindowExpired
            | Self::TenantInactive
            | Self::TenantMismatch => StatusCode::FORBIDDEN,

            // 402 Payment Required
            Self::PaymentRequired => StatusCode::PAYMENT_REQUIRED,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError | Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageFull
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
