//! Data models
//!
//! Shared between order-server and UI clients (via API).
//! IDs are opaque strings; money is `rust_decimal::Decimal`.

pub mod menu;
pub mod staff;
pub mod table;
pub mod tenant;

// Re-exports
pub use menu::*;
pub use staff::*;
pub use table::*;
pub use tenant::*;
