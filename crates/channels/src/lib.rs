//! Uniform adapters over the external sales channels.
//!
//! Every channel is modeled as an opaque capability behind the
//! [`ChannelClient`] trait: fetch orders, fetch one order, push a status
//! update, push an absolute inventory quantity, report health. Each adapter
//! decides live vs simulated mode at construction from its credentials; in
//! simulated mode it fabricates structurally valid orders for testing.

pub mod adapters;
pub mod client;
pub mod config;
pub mod order;
mod simulated;

pub use adapters::{AmazonChannel, EbayChannel, EtsyChannel, ShopifyChannel};
pub use client::{ChannelClient, ChannelError};
pub use config::{AmazonConfig, EbayConfig, EtsyConfig, ShopifyConfig};
pub use order::{Address, Customer, Order, OrderLine, OrderStatus};
