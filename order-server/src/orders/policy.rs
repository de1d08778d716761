//! Order transition table
//!
//! Every permitted `(from, to)` edge with the capability it requires. Any
//! pair not listed here is rejected.

use shared::order::OrderStatus;

use crate::auth::capability::{
    ORDER_CANCEL, ORDER_COMPLETE, ORDER_CONFIRM, ORDER_PREPARE, ORDER_READY,
};

/// One permitted edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub capability: &'static str,
}

const fn edge(from: OrderStatus, to: OrderStatus, capability: &'static str) -> TransitionRule {
    TransitionRule {
        from,
        to,
        capability,
    }
}

pub const TRANSITIONS: &[TransitionRule] = &[
    edge(OrderStatus::Pending, OrderStatus::Confirmed, ORDER_CONFIRM),
    edge(OrderStatus::Confirmed, OrderStatus::Preparing, ORDER_PREPARE),
    edge(OrderStatus::Preparing, OrderStatus::Ready, ORDER_READY),
    edge(OrderStatus::Ready, OrderStatus::Completed, ORDER_COMPLETE),
    edge(OrderStatus::Pending, OrderStatus::Cancelled, ORDER_CANCEL),
    edge(OrderStatus::Confirmed, OrderStatus::Cancelled, ORDER_CANCEL),
    edge(OrderStatus::Preparing, OrderStatus::Cancelled, ORDER_CANCEL),
    edge(OrderStatus::Ready, OrderStatus::Cancelled, ORDER_CANCEL),
];

/// The rule of an edge, if the edge exists
pub fn rule(from: OrderStatus, to: OrderStatus) -> Option<&'static TransitionRule> {
    TRANSITIONS.iter().find(|r| r.from == from && r.to == to)
}

pub fn is_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    rule(from, to).is_some()
}
