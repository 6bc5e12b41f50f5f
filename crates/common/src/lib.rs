//! Shared value types for the order and inventory hub.

pub mod types;

pub use types::{ChannelId, Money, ParseChannelError, Sku};
