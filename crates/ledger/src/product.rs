//! Catalog products and their audit trail.

use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of inventory movement, recorded on every change log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Sale,
    Restock,
    Adjustment,
    Sync,
    Reservation,
    Release,
}

impl ChangeType {
    /// Returns the lowercase wire name for this change type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Sale => "sale",
            ChangeType::Restock => "restock",
            ChangeType::Adjustment => "adjustment",
            ChangeType::Sync => "sync",
            ChangeType::Reservation => "reservation",
            ChangeType::Release => "release",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(ChangeType::Sale),
            "restock" => Ok(ChangeType::Restock),
            "adjustment" => Ok(ChangeType::Adjustment),
            "sync" => Ok(ChangeType::Sync),
            "reservation" => Ok(ChangeType::Reservation),
            "release" => Ok(ChangeType::Release),
            other => Err(format!("unknown change type: {other}")),
        }
    }
}

/// A catalog product with its two-counter inventory split.
///
/// Counters are mutated exclusively through the ledger; both are clamped at
/// zero and never go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub description: Option<String>,
    pub quantity_available: u32,
    pub quantity_reserved: u32,
    pub reorder_point: u32,
    pub reorder_quantity: u32,
    pub cost: Option<Money>,
    pub price: Option<Money>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product with empty counters and default reorder settings.
    pub fn new(sku: impl Into<Sku>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            sku: sku.into(),
            name: name.into(),
            description: None,
            quantity_available: 0,
            quantity_reserved: 0,
            reorder_point: 10,
            reorder_quantity: 50,
            cost: None,
            price: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the available quantity (catalog import only).
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity_available = quantity;
        self
    }

    /// Sets the reorder point.
    pub fn with_reorder_point(mut self, reorder_point: u32) -> Self {
        self.reorder_point = reorder_point;
        self
    }

    /// Sets the selling price.
    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    /// True when the available quantity has fallen to the reorder point.
    pub fn needs_reorder(&self) -> bool {
        self.quantity_available <= self.reorder_point
    }
}

/// Optional context attached to a change log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeContext {
    pub channel: Option<ChannelId>,
    pub order_ref: Option<String>,
    pub reason: Option<String>,
}

impl ChangeContext {
    /// Empty context.
    pub fn none() -> Self {
        Self::default()
    }

    /// Context carrying only a reason string.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Context carrying an order reference and a reason.
    pub fn for_order(order_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            channel: None,
            order_ref: Some(order_ref.into()),
            reason: Some(reason.into()),
        }
    }

    /// Attaches the originating channel.
    pub fn on_channel(mut self, channel: ChannelId) -> Self {
        self.channel = Some(channel);
        self
    }
}

/// One immutable entry in the append-only inventory audit log.
///
/// The entry records the requested arithmetic: `quantity_after` is always
/// `quantity_before + quantity_change`, even when the stored counter was
/// clamped at zero afterwards. Quantities are signed for that reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: Uuid,
    pub sku: Sku,
    pub change_type: ChangeType,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub quantity_change: i64,
    pub channel: Option<ChannelId>,
    pub order_ref: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChangeLogEntry {
    /// Records a change of `delta` against a counter that read
    /// `quantity_before` at the time of the mutation.
    pub fn record(
        sku: Sku,
        change_type: ChangeType,
        quantity_before: i64,
        delta: i64,
        context: ChangeContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sku,
            change_type,
            quantity_before,
            quantity_after: quantity_before + delta,
            quantity_change: delta,
            channel: context.channel,
            order_ref: context.order_ref,
            reason: context.reason,
            created_at: Utc::now(),
        }
    }

    /// True when `quantity_after - quantity_before == quantity_change`.
    pub fn is_balanced(&self) -> bool {
        self.quantity_after - self.quantity_before == self.quantity_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_type_round_trips_through_str() {
        for ct in [
            ChangeType::Sale,
            ChangeType::Restock,
            ChangeType::Adjustment,
            ChangeType::Sync,
            ChangeType::Reservation,
            ChangeType::Release,
        ] {
            let parsed: ChangeType = ct.as_str().parse().unwrap();
            assert_eq!(parsed, ct);
        }
        assert!("theft".parse::<ChangeType>().is_err());
    }

    #[test]
    fn new_product_has_default_reorder_settings() {
        let product = Product::new("WIDGET-001", "Premium Widget");
        assert_eq!(product.quantity_available, 0);
        assert_eq!(product.quantity_reserved, 0);
        assert_eq!(product.reorder_point, 10);
        assert_eq!(product.reorder_quantity, 50);
        assert!(product.needs_reorder());
    }

    #[test]
    fn needs_reorder_at_or_below_reorder_point() {
        let product = Product::new("WIDGET-001", "Premium Widget").with_reorder_point(10);

        let at_point = product.clone().with_quantity(10);
        assert!(at_point.needs_reorder());

        let above = product.clone().with_quantity(11);
        assert!(!above.needs_reorder());
    }

    #[test]
    fn record_derives_quantity_after() {
        let entry = ChangeLogEntry::record(
            Sku::new("WIDGET-001"),
            ChangeType::Restock,
            5,
            20,
            ChangeContext::with_reason("weekly restock"),
        );
        assert_eq!(entry.quantity_after, 25);
        assert!(entry.is_balanced());
    }

    #[test]
    fn record_keeps_requested_delta_when_negative() {
        // A mutation that drives the counter below zero still logs the
        // requested arithmetic; the stored counter is clamped separately.
        let entry = ChangeLogEntry::record(
            Sku::new("WIDGET-001"),
            ChangeType::Sale,
            3,
            -10,
            ChangeContext::none(),
        );
        assert_eq!(entry.quantity_after, -7);
        assert_eq!(entry.quantity_change, -10);
        assert!(entry.is_balanced());
    }

    #[test]
    fn context_builders_populate_fields() {
        let ctx = ChangeContext::for_order("42", "order placed").on_channel(ChannelId::Shopify);
        assert_eq!(ctx.order_ref.as_deref(), Some("42"));
        assert_eq!(ctx.reason.as_deref(), Some("order placed"));
        assert_eq!(ctx.channel, Some(ChannelId::Shopify));
    }
}
