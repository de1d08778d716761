//! Order Server - multi-tenant QR ordering core
//!
//! Diners scan a table code, receive an anonymous table token and place
//! orders; staff move orders through the kitchen lifecycle; every committed
//! change fans out to live subscribers of the same restaurant.
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/        # config, state, server, seed data
//! ├── auth/        # tokens, capability policy, AccessContext
//! ├── directory/   # tenants, tables, staff
//! ├── catalog.rs   # menu lookup for pricing
//! ├── orders/      # order lifecycle engine
//! ├── message/     # per-tenant event fan-out
//! ├── db/          # redb persistence
//! ├── api/         # HTTP and WebSocket routes
//! └── utils/       # logging, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod directory;
pub mod message;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{AccessContext, AuthorizationResolver, JwtService, TokenService};
pub use core::{Config, Server, ServerState};
pub use directory::TenantDirectory;
pub use message::MessageBus;
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro (target "security")
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` if present (a missing file is normal outside development)
pub fn setup_environment() {
    let _ = dotenv::dotenv();
}
