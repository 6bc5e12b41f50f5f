//! Shopify storefront adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};

use crate::client::{ChannelClient, ChannelError};
use crate::config::ShopifyConfig;
use crate::order::{Order, OrderStatus};
use crate::simulated::{self, SimulatedProfile};

const PROFILE: SimulatedProfile = SimulatedProfile {
    channel: ChannelId::Shopify,
    order_cap: 20,
    tax_bps: 875,
    flat_shipping: Money::from_cents(599),
    free_shipping_over: Some(Money::from_cents(5_000)),
    max_line_quantity: 3,
    customer_label: "Customer",
    email_label: Some("customer"),
    catalog: &[
        ("WIDGET-001", "Premium Widget", 2_999),
        ("GADGET-042", "Smart Gadget Pro", 14_999),
        ("TOOL-123", "Professional Tool Set", 8_999),
        ("ACC-999", "Deluxe Accessory Kit", 3_999),
    ],
    cities: &[
        ("New York", "NY"),
        ("Los Angeles", "CA"),
        ("Chicago", "IL"),
        ("Houston", "TX"),
        ("Phoenix", "AZ"),
    ],
    street: "Main Street",
    street_base: 100,
    postal_base: 10_000,
    line2: Some((3, "Apt")),
};

/// Client for the Shopify Admin API.
///
/// Runs simulated when forced or when the shop URL or access token is
/// missing. The live path requires a deployment-specific Admin API client
/// and is not wired here.
pub struct ShopifyChannel {
    config: ShopifyConfig,
    simulated: bool,
}

impl ShopifyChannel {
    /// Creates a Shopify adapter; `force_simulated` overrides complete
    /// credentials (the global demo flag).
    pub fn new(config: ShopifyConfig, force_simulated: bool) -> Self {
        let simulated = force_simulated || !config.is_complete();
        Self { config, simulated }
    }
}

#[async_trait]
impl ChannelClient for ShopifyChannel {
    fn id(&self) -> ChannelId {
        ChannelId::Shopify
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
            tracing::debug!(order_id, %status, ?tracking_number, "simulated shopify status update");
            return Ok(true);
        }
        Ok(false)
    }

    async fn sync_inventory(&self, sku: &Sku, quantity: u32) -> Result<bool, ChannelError> {
        if self.simulated {
            tracing::debug!(%sku, quantity, "simulated shopify inventory sync");
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

    fn simulated_channel() -> ShopifyChannel {
        ShopifyChannel::new(ShopifyConfig::default(), true)
    }

    #[tokio::test]
    async fn missing_credentials_force_simulated_mode() {
        let channel = ShopifyChannel::new(ShopifyConfig::default(), false);
        assert!(channel.is_simulated());
    }

    #[tokio::test]
    async fn simulated_orders_are_structurally_valid() {
        let channel = simulated_channel();
        let orders = channel.fetch_orders(50, None).await.unwrap();

        assert!(!orders.is_empty());
        assert!(orders.len() <= 20);
        for order in &orders {
            assert_eq!(order.channel, ChannelId::Shopify);
            assert!(order.id.starts_with("SHOP"));
            assert!(order.totals_reconcile());
            assert!(order.tracking_consistent());
            assert!(!order.lines.is_empty());
            assert!(order.lines.iter().all(|l| (1..=3).contains(&l.quantity)));
        }
    }

    #[tokio::test]
    async fn fetch_orders_respects_limit() {
        let channel = simulated_channel();
        let orders = channel.fetch_orders(5, None).await.unwrap();
        assert_eq!(orders.len(), 5);
    }

    #[tokio::test]
    async fn fetch_order_echoes_requested_id() {
        let channel = simulated_channel();
        let order = channel.fetch_order("SHOP1234").await.unwrap().unwrap();
        assert_eq!(order.id, "SHOP1234");
        assert_eq!(order.channel, ChannelId::Shopify);
    }

    #[tokio::test]
    async fn simulated_pushes_succeed() {
        let channel = simulated_channel();
        assert!(
            channel
                .update_status("SHOP1000", OrderStatus::Shipped, Some("1Z999AA100000001"))
                .await
                .unwrap()
        );
        assert!(
            channel
                .sync_inventory(&Sku::new("WIDGET-001"), 42)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn live_mode_without_wire_client_is_inert() {
        let config = ShopifyConfig {
            shop_url: "example.myshopify.com".to_string(),
            access_token: "shpat_test".to_string(),
            api_version: "2024-01".to_string(),
        };
        let channel = ShopifyChannel::new(config, false);

        assert!(!channel.is_simulated());
        assert!(channel.health_check().await);
        assert!(channel.fetch_orders(10, None).await.unwrap().is_empty());
        assert!(
            !channel
                .update_status("SHOP1000", OrderStatus::Shipped, None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn health_check_is_idempotent() {
        let channel = simulated_channel();
        assert_eq!(channel.health_check().await, channel.health_check().await);
    }
}
