//! Etsy marketplace adapter (Open API v3).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};

use crate::client::{ChannelClient, ChannelError};
use crate::config::EtsyConfig;
use crate::order::{Order, OrderStatus};
use crate::simulated::{self, SimulatedProfile};

const PROFILE: SimulatedProfile = SimulatedProfile {
    channel: ChannelId::Etsy,
    order_cap: 10,
    tax_bps: 825,
    flat_shipping: Money::from_cents(499),
    free_shipping_over: None,
    max_line_quantity: 1,
    customer_label: "Etsy Shopper",
    email_label: Some("etsyshopper"),
    catalog: &[
        ("ETSY-CRAFT-001", "Handmade Ceramic Mug", 2_499),
        ("ETSY-ART-234", "Custom Portrait Print", 4_999),
        ("ETSY-JEWELRY-567", "Sterling Silver Necklace", 8_999),
        ("ETSY-DECOR-890", "Rustic Wall Hanging", 3_999),
    ],
    cities: &[
        ("Brooklyn", "NY"),
        ("Nashville", "TN"),
        ("Asheville", "NC"),
        ("Santa Fe", "NM"),
        ("Madison", "WI"),
    ],
    street: "Artisan Lane",
    street_base: 400,
    postal_base: 40_000,
    line2: None,
};

/// Client for the Etsy Open API.
pub struct EtsyChannel {
    config: EtsyConfig,
    simulated: bool,
}

impl EtsyChannel {
    /// Creates an Etsy adapter; simulated when forced or credentials are
    /// incomplete.
    pub fn new(config: EtsyConfig, force_simulated: bool) -> Self {
        let simulated = force_simulated || !config.is_complete();
        Self { config, simulated }
    }
}

#[async_trait]
impl ChannelClient for EtsyChannel {
    fn id(&self) -> ChannelId {
        ChannelId::Etsy
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
            tracing::debug!(order_id, %status, ?tracking_number, "simulated etsy status update");
            return Ok(true);
        }
        Ok(false)
    }

    async fn sync_inventory(&self, sku: &Sku, quantity: u32) -> Result<bool, ChannelError> {
        if self.simulated {
            tracing::debug!(%sku, quantity, "simulated etsy inventory sync");
            return Ok(true);
        }
        Ok(false)
    }

    async fn health_check(&self) -> bool {
        self.simulated || self.config.is_complete()
    }
}
