//! Shared types for the QR ordering platform
//!
//! Common types used by the order server and its UI clients: error codes and
//! response envelopes, domain models, order types, live events and DTOs.

pub mod client;
pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorClass, ErrorCode};
pub use order::{DomainEvent, EventPayload};
