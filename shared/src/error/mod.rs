//! Unified error system
//!
//! This module provides the error handling shared by server and clients:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`ErrorClass`]: Classification of errors by caller reaction
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
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
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::validation("Quantity must be positive")
//!     .with_detail("field", "items[0].quantity");
//!
//! let response = ApiResponse::<()>::failure(err);
//! assert_eq!(response.code, Some(ErrorCode::ValidationFailed.code()));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::{ErrorCategory, ErrorClass};
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
