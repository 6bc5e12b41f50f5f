//! eBay marketplace adapter (Trading API).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};

use crate::client::{ChannelClient, ChannelError};
use crate::config::EbayConfig;
use crate::order::{Order, OrderStatus};
use crate::simulated::{self, SimulatedProfile};

// eBay orders are typically single quantity.
const PROFILE: SimulatedProfile = SimulatedProfile {
    channel: ChannelId::Ebay,
    order_cap: 12,
    tax_bps: 900,
    flat_shipping: Money::from_cents(799),
    free_shipping_over: None,
    max_line_quantity: 1,
    customer_label: "eBay Buyer",
    email_label: Some("ebaybuyer"),
    catalog: &[
        ("EBAY-VINTAGE-01", "Vintage Collectible Item", 4_500),
        ("EBAY-PARTS-123", "Automotive Parts Set", 8_950),
        ("EBAY-WATCH-999", "Designer Watch", 29_999),
        ("EBAY-GAME-456", "Retro Video Game", 5_999),
    ],
    cities: &[
        ("San Jose", "CA"),
        ("Austin", "TX"),
        ("Portland", "OR"),
        ("Atlanta", "GA"),
        ("Detroit", "MI"),
    ],
    street: "Auction Drive",
    street_base: 300,
    postal_base: 30_000,
    line2: Some((4, "Suite")),
};

/// Client for the eBay Trading API.
pub struct EbayChannel {
    config: EbayConfig,
    simulated: bool,
}

impl EbayChannel {
    /// Creates an eBay adapter; simulated when forced or credentials are
    /// incomplete.
    pub fn new(config: EbayConfig, force_simulated: bool) -> Self {
        let simulated = force_simulated || !config.is_complete();
        Self { config, simulated }
    }
}

#[async_trait]
impl ChannelClient for EbayChannel {
    fn id(&self) -> ChannelId {
        ChannelId::Ebay
    }

    fn is_simulated(&self) -> bool {
        self.simulated
    }

    async fn fetch_orders(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, ChannelError> {
        if self.simulated {
            return Ok(simulated::orders(&PROFILE, limit, since));
        }
        Ok(Vec::new())
    }

    async fn fetch_order(&self, order_id: &str) -> Result<Option<Order>, ChannelError> {
        if self.simulated {
            return Ok(simulated::order_with_id(&PROFILE, order_id));
        }
        Ok(None)
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<bool, ChannelError> {
        if self.simulated {
            tracing::debug!(order_id, %status, ?tracking_number, "simulated ebay status update");
            return Ok(true);
        }
        Ok(false)
    }

    async fn sync_inventory(&self, sku: &Sku, quantity: u32) -> Result<bool, ChannelError> {
        if self.simulated {
            tracing::debug!(%sku, quantity, "simulated ebay inventory sync");
            return Ok(true);
        }
        Ok(false)
    }

    async fn health_check(&self) -> bool {
        self.simulated || self.config.is_complete()
    }
}
