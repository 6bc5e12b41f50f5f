//! The unified order shape returned by every channel.
//!
//! Orders are read-only views fetched on demand; they are never persisted
//! locally and are not a source of truth for anything. Repeated fetches are
//! not guaranteed to return identical data.

use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};
use serde::{Deserialize, Serialize};

/// Order fulfillment status, shared across all channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Returns the lowercase wire name for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// True for statuses that carry tracking information.
    pub fn expects_tracking(&self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Customer attached to an order. Some channels withhold the email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
}

/// Shipping address as reported by the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A single line in an order, owned exclusively by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: Sku,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    pub variant: Option<String>,
}

impl OrderLine {
    /// Creates a line with the total derived from quantity and unit price.
    pub fn new(
        sku: impl Into<Sku>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            sku: sku.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            total_price: unit_price.multiply(quantity),
            variant: None,
        }
    }
}

/// An order as reported by one channel.
///
/// `id` is channel-scoped; it is globally unique only after prefixing with
/// the channel name (see [`Order::global_id`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub channel: ChannelId,
    pub order_number: Option<String>,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub customer: Customer,
    pub shipping_address: Option<Address>,
    pub lines: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping_cost: Money,
    pub total: Money,
    pub currency: String,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
}

impl Order {
    /// Returns the globally unique `"{channel}:{id}"` identifier.
    pub fn global_id(&self) -> String {
        format!("{}:{}", self.channel, self.id)
    }

    /// True when `total == subtotal + tax + shipping_cost`.
    ///
    /// Amounts are integer cents, so the check is exact.
    pub fn totals_reconcile(&self) -> bool {
        self.total == self.subtotal + self.tax + self.shipping_cost
    }

    /// True when tracking fields are present exactly for shipped or
    /// delivered orders.
    pub fn tracking_consistent(&self) -> bool {
        let has_tracking = self.tracking_number.is_some() && self.carrier.is_some();
        let bare = self.tracking_number.is_none() && self.carrier.is_none();
        if self.status.expects_tracking() {
            has_tracking
        } else {
            bare
        }
    }
}
