//! The uniform channel capability contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ChannelId, Sku};
use thiserror::Error;

use crate::order::{Order, OrderStatus};

/// Errors reported by a channel adapter.
///
/// A channel failure is always scoped to that channel; callers above the
/// adapter boundary decide whether to drop, retry, or surface it. Adapters
/// never panic for remote unavailability.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel could not be reached or answered with a transport-level
    /// failure (timeouts are mapped here by the caller).
    #[error("channel {channel} unavailable: {reason}")]
    Unavailable { channel: ChannelId, reason: String },

    /// The channel rejected the configured credentials.
    #[error("channel {channel} rejected credentials")]
    Auth { channel: ChannelId },
}

impl ChannelError {
    /// Creates an `Unavailable` error for the given channel.
    pub fn unavailable(channel: ChannelId, reason: impl Into<String>) -> Self {
        ChannelError::Unavailable {
            channel,
            reason: reason.into(),
        }
    }

    /// Returns the channel this error is scoped to.
    pub fn channel(&self) -> ChannelId {
        match self {
            ChannelError::Unavailable { channel, .. } | ChannelError::Auth { channel } => *channel,
        }
    }
}

/// Uniform capability set implemented by every channel adapter.
///
/// All implementations must be thread-safe (Send + Sync). None of the
/// operations compensate on failure; retry and reconciliation live with the
/// callers.
#[async_trait]
pub trait ChannelClient: Send + Sync {
    /// The channel this adapter talks to.
    fn id(&self) -> ChannelId;

    /// True when the adapter fabricates data instead of calling a live API.
    fn is_simulated(&self) -> bool;

    /// Fetches at most `limit` orders, optionally only those placed at or
    /// after `since`. Ordering within the result is unspecified.
    ///
    /// Transient unavailability is an error value, distinguishable from an
    /// empty result.
    async fn fetch_orders(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, ChannelError>;

    /// Fetches a single order by its channel-scoped ID.
    async fn fetch_order(&self, order_id: &str) -> Result<Option<Order>, ChannelError>;

    /// Pushes a fulfillment status update. Best-effort: `Ok(false)` means
    /// the channel refused the update.
    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<bool, ChannelError>;

    /// Pushes an absolute (not delta) inventory quantity for a SKU.
    async fn sync_inventory(&self, sku: &Sku, quantity: u32) -> Result<bool, ChannelError>;

    /// Cheap, side-effect-free liveness probe. Never fails.
    async fn health_check(&self) -> bool;
}
