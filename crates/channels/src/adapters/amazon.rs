//! Amazon marketplace adapter (SP-API).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};

use crate::client::{ChannelClient, ChannelError};
use crate::config::AmazonConfig;
use crate::order::{Order, OrderStatus};
use crate::simulated::{self, SimulatedProfile};

// Amazon withholds buyer emails and handles its own shipping.
const PROFILE: SimulatedProfile = SimulatedProfile {
    channel: ChannelId::Amazon,
    order_cap: 15,
    tax_bps: 800,
    flat_shipping: Money::zero(),
    free_shipping_over: None,
    max_line_quantity: 2,
    customer_label: "Amazon Customer",
    email_label: None,
    catalog: &[
        ("AMZ-BOOK-001", "Bestselling Novel", 1_999),
        ("AMZ-ELECT-123", "Wireless Earbuds", 7_999),
        ("AMZ-HOME-456", "Kitchen Appliance", 12_999),
        ("AMZ-TOY-789", "Educational Toy Set", 3_499),
    ],
    cities: &[
        ("Seattle", "WA"),
        ("Dallas", "TX"),
        ("Miami", "FL"),
        ("Denver", "CO"),
        ("Boston", "MA"),
    ],
    street: "Commerce Boulevard",
    street_base: 200,
    postal_base: 20_000,
    line2: None,
};

/// Client for the Amazon Selling Partner API.
pub struct AmazonChannel {
    config: AmazonConfig,
    simulated: bool,
}

impl AmazonChannel {
    /// Creates an Amazon adapter; simulated when forced or credentials are
    /// incomplete.
    pub fn new(config: AmazonConfig, force_simulated: bool) -> Self {
        let simulated = force_simulated || !config.is_complete();
        Self { config, simulated }
    }
}

#[async_trait]
impl ChannelClient for AmazonChannel {
    fn id(&self) -> ChannelId {
        ChannelId::Amazon
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
            tracing::debug!(order_id, %status, ?tracking_number, "simulated amazon status update");
            return Ok(true);
        }
        Ok(false)
    }

    async fn sync_inventory(&self, sku: &Sku, quantity: u32) -> Result<bool, ChannelError> {
        if self.simulated {
            tracing::debug!(%sku, quantity, "simulated amazon inventory sync");
            return Ok(true);
        }
        Ok(false)
    }

    async fn health_check(&self) -> bool {
        self.simulated || self.config.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_orders_have_amazon_shape() {
        let channel = AmazonChannel::new(AmazonConfig::default(), true);
        let orders = channel.fetch_orders(50, None).await.unwrap();

        assert!(!orders.is_empty());
        assert!(orders.len() <= 15);
        for order in &orders {
            assert_eq!(order.channel, ChannelId::Amazon);
            assert!(order.id.starts_with("AMZ"));
            // No buyer emails, no seller-paid shipping on this channel.
            assert!(order.customer.email.is_none());
            assert_eq!(order.shipping_cost, Money::zero());
            assert!(order.totals_reconcile());
            assert!(order.tracking_consistent());
        }
    }

    #[tokio::test]
    async fn shipped_orders_use_amazon_logistics() {
        let channel = AmazonChannel::new(AmazonConfig::default(), true);
        let orders = channel.fetch_orders(50, None).await.unwrap();

        for order in orders.iter().filter(|o| o.status.expects_tracking()) {
            assert_eq!(order.carrier.as_deref(), Some("Amazon Logistics"));
            assert!(order.tracking_number.as_deref().unwrap().starts_with("TBA"));
        }
    }

    #[tokio::test]
    async fn since_filter_drops_older_orders() {
        let channel = AmazonChannel::new(AmazonConfig::default(), true);
        let cutoff = Utc::now() - chrono::Duration::days(7);
        let orders = channel.fetch_orders(50, Some(cutoff)).await.unwrap();

        assert!(orders.iter().all(|o| o.placed_at >= cutoff));
    }
}
