//! Order module
//!
//! - Types: orders, lines, statuses, timeline entries
//! - Events: committed changes fanned out to live subscribers

pub mod event;
pub mod types;

// Re-exports
pub use event::{DomainEvent, EventPayload, StreamKey};
pub use types::*;
