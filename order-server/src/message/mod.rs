//! Live event fan-out

mod bus;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, MessageBus, Subscription, SubscriptionScope};
