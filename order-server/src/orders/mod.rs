//! Order Lifecycle Module
//!
//! - **manager**: OrdersManager, creation, transitions, payments, notes
//! - **policy**: transition table and the capability guarding each edge
//! - **pricing**: server-side line pricing and totals
//!
//! # Data Flow
//!
//! ```text
//! Request → AccessContext → OrdersManager → redb (one write txn)
//!                                 ↓
//!                            MessageBus → live subscribers
//! ```

mod error;
pub mod manager;
pub mod policy;
pub mod pricing;

pub use error::{InvalidItemReason, OrderError, OrderResult};
pub use manager::{EngineConfig, OrdersManager};
