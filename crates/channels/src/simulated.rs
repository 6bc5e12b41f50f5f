//! Fabricated order data for adapters running in simulated mode.
//!
//! Generated orders are pseudo-random but satisfy the same structural
//! invariants as live data: totals reconcile exactly, tracking fields are
//! present iff the order is shipped or delivered, and every order carries at
//! least one line.

use chrono::{DateTime, Duration, Utc};
use common::{ChannelId, Money};
use rand::Rng;

use crate::order::{Address, Customer, Order, OrderLine, OrderStatus};

/// Generation profile for one channel's simulated orders.
///
/// The values mirror each platform's real-world texture: catalog, tax rate,
/// shipping policy, typical line quantities, and how many orders a single
/// page returns.
pub(crate) struct SimulatedProfile {
    pub channel: ChannelId,
    /// Upper bound on orders per fetch, regardless of the requested limit.
    pub order_cap: usize,
    /// Sales tax in basis points.
    pub tax_bps: i64,
    pub flat_shipping: Money,
    /// Subtotals at or above this ship free.
    pub free_shipping_over: Option<Money>,
    pub max_line_quantity: u32,
    pub customer_label: &'static str,
    /// Local part prefix for fabricated emails; None for channels that
    /// withhold customer emails.
    pub email_label: Option<&'static str>,
    /// (sku, product name, unit price in cents)
    pub catalog: &'static [(&'static str, &'static str, i64)],
    pub cities: &'static [(&'static str, &'static str)],
    pub street: &'static str,
    pub street_base: usize,
    pub postal_base: usize,
    /// Every nth order gets a second address line with this label.
    pub line2: Option<(usize, &'static str)>,
}

const STATUSES: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

/// Generates up to `limit` orders for the profile's channel.
pub(crate) fn orders(
    profile: &SimulatedProfile,
    limit: usize,
    since: Option<DateTime<Utc>>,
) -> Vec<Order> {
    let mut rng = rand::thread_rng();
    let count = limit.min(profile.order_cap);
    let mut orders = Vec::with_capacity(count);

    for i in 0..count {
        orders.push(generate(profile, i, &mut rng));
    }

    if let Some(since) = since {
        orders.retain(|o| o.placed_at >= since);
    }

    orders
}

/// Generates a single order carrying the requested channel-scoped ID.
pub(crate) fn order_with_id(profile: &SimulatedProfile, order_id: &str) -> Option<Order> {
    let mut rng = rand::thread_rng();
    let mut order = generate(profile, 0, &mut rng);
    order.id = order_id.to_string();
    Some(order)
}

fn generate(profile: &SimulatedProfile, i: usize, rng: &mut impl Rng) -> Order {
    let (sku, product_name, price_cents) = profile.catalog[rng.gen_range(0..profile.catalog.len())];
    let quantity = rng.gen_range(1..=profile.max_line_quantity);
    let status = STATUSES[rng.gen_range(0..STATUSES.len())];
    let placed_at = Utc::now() - Duration::days(rng.gen_range(0..=30));

    let line = OrderLine::new(sku, product_name, quantity, Money::from_cents(price_cents));
    let subtotal = line.total_price;
    let tax = subtotal.percent_bps(profile.tax_bps);
    let shipping_cost = match profile.free_shipping_over {
        Some(threshold) if subtotal >= threshold => Money::zero(),
        _ => profile.flat_shipping,
    };
    let total = subtotal + tax + shipping_cost;

    let (tracking_number, carrier) = if status.expects_tracking() {
        let (number, carrier) = tracking(profile.channel, i, rng);
        (Some(number), Some(carrier.to_string()))
    } else {
        (None, None)
    };

    let (city, state) = profile.cities[rng.gen_range(0..profile.cities.len())];
    let line2 = profile
        .line2
        .filter(|(stride, _)| i % stride == 0)
        .map(|(_, label)| format!("{} {}", label, i + 1));

    Order {
        id: order_id(profile.channel, i, rng),
        channel: profile.channel,
        order_number: Some(order_number(profile.channel, i)),
        status,
        placed_at,
        customer: Customer {
            name: format!("{} {}", profile.customer_label, i + 1),
            email: profile
                .email_label
                .map(|label| format!("{}{}@example.com", label, i + 1)),
        },
        shipping_address: Some(Address {
            line1: format!("{} {}", profile.street_base + i, profile.street),
            line2,
            city: city.to_string(),
            state: state.to_string(),
            postal_code: format!("{}", profile.postal_base + i),
            country: "US".to_string(),
        }),
        lines: vec![line],
        subtotal,
        tax,
        shipping_cost,
        total,
        currency: "USD".to_string(),
        tracking_number,
        carrier,
    }
}

fn order_id(channel: ChannelId, i: usize, rng: &mut impl Rng) -> String {
    match channel {
        ChannelId::Shopify => format!("SHOP{}", 1000 + i),
        ChannelId::Amazon => format!("AMZ{}-{}", 2000 + i, rng.gen_range(1_000_000..10_000_000)),
        ChannelId::Ebay => format!("EBAY{}-{}", 3000 + i, rng.gen_range(10_000..100_000)),
        ChannelId::Etsy => format!("ETSY{}", 4000 + i),
    }
}

fn order_number(channel: ChannelId, i: usize) -> String {
    match channel {
        ChannelId::Shopify => format!("#{}", 1000 + i),
        ChannelId::Amazon => format!("AMZ-{}", 2000 + i),
        ChannelId::Ebay => format!("EBAY-{}", 3000 + i),
        ChannelId::Etsy => format!("ETSY-{}", 4000 + i),
    }
}

fn tracking(channel: ChannelId, i: usize, rng: &mut impl Rng) -> (String, &'static str) {
    match channel {
        ChannelId::Shopify => (format!("1Z999AA1{i:08}"), "UPS"),
        ChannelId::Amazon => (
            format!("TBA{}", rng.gen_range(100_000_000u64..1_000_000_000)),
            "Amazon Logistics",
        ),
        ChannelId::Ebay => (
            format!("9400{}", rng.gen_range(1_000_000_000u64..10_000_000_000)),
            "USPS",
        ),
        ChannelId::Etsy => (
            format!("9205{}", rng.gen_range(5_000_000_000u64..6_000_000_000)),
            "USPS First Class",
        ),
    }
}
