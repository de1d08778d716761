//! Utilities - logging, time source and validation helpers

pub mod logger;
pub mod time;
pub mod validation;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorClass, ErrorCode};
pub use time::{Clock, ManualClock, SystemClock};
