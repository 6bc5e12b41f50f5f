use serde::{Deserialize, Serialize};

/// Stock-keeping unit, the product identifier shared by the ledger and all
/// sales channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a new SKU from a string.
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Sku {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One of the configured sales channels.
///
/// A closed set: adding a channel means adding a variant here and an adapter
/// in the `channels` crate; the aggregation engine is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    Shopify,
    Amazon,
    Ebay,
    Etsy,
}

impl ChannelId {
    /// All configured channels, in canonical order.
    pub const ALL: [ChannelId; 4] = [
        ChannelId::Shopify,
        ChannelId::Amazon,
        ChannelId::Ebay,
        ChannelId::Etsy,
    ];

    /// Returns the lowercase wire identifier for this channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelId::Shopify => "shopify",
            ChannelId::Amazon => "amazon",
            ChannelId::Ebay => "ebay",
            ChannelId::Etsy => "etsy",
        }
    }

    /// Returns the human-readable channel name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ChannelId::Shopify => "Shopify",
            ChannelId::Amazon => "Amazon",
            ChannelId::Ebay => "eBay",
            ChannelId::Etsy => "Etsy",
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unrecognized channel identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChannelError(pub String);

impl std::fmt::Display for ParseChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown channel: {}", self.0)
    }
}

impl std::error::Error for ParseChannelError {}

impl std::str::FromStr for ChannelId {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopify" => Ok(ChannelId::Shopify),
            "amazon" => Ok(ChannelId::Amazon),
            "ebay" => Ok(ChannelId::Ebay),
            "etsy" => Ok(ChannelId::Etsy),
            other => Err(ParseChannelError(other.to_string())),
        }
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents * quantity as i64,
        }
    }

    /// Returns this amount scaled by a rate given in basis points,
    /// rounded half-up (875 bps = 8.75%).
    pub fn percent_bps(&self, bps: i64) -> Money {
        Money {
            cents: (self.cents * bps + 5_000) / 10_000,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dollars = (self.cents / 100).abs();
        let rem = (self.cents % 100).abs();
        if self.cents < 0 {
            write!(f, "-${dollars}.{rem:02}")
        } else {
            write!(f, "${dollars}.{rem:02}")
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents - rhs.cents,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_string_conversion() {
        let sku = Sku::new("WIDGET-001");
        assert_eq!(sku.as_str(), "WIDGET-001");

        let sku2: Sku = "GADGET-042".into();
        assert_eq!(sku2.as_str(), "GADGET-042");
    }

    #[test]
    fn sku_serialization_is_transparent() {
        let sku = Sku::new("WIDGET-001");
        let json = serde_json::to_string(&sku).unwrap();
        assert_eq!(json, "\"WIDGET-001\"");
    }

    #[test]
    fn channel_id_round_trips_through_str() {
        for channel in ChannelId::ALL {
            let parsed: ChannelId = channel.as_str().parse().unwrap();
            assert_eq!(parsed, channel);
        }
    }

    #[test]
    fn channel_id_rejects_unknown_names() {
        let err = "walmart".parse::<ChannelId>().unwrap_err();
        assert_eq!(err, ParseChannelError("walmart".to_string()));
    }

    #[test]
    fn channel_id_serde_is_lowercase() {
        let json = serde_json::to_string(&ChannelId::Ebay).unwrap();
        assert_eq!(json, "\"ebay\"");
        let parsed: ChannelId = serde_json::from_str("\"etsy\"").unwrap();
        assert_eq!(parsed, ChannelId::Etsy);
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply(3).cents(), 3000);
    }

    #[test]
    fn money_percent_bps_rounds_half_up() {
        // 8.75% of $29.99 = $2.624125 -> $2.62
        assert_eq!(Money::from_cents(2999).percent_bps(875).cents(), 262);
        // 9% of $45.00 = $4.05 exactly
        assert_eq!(Money::from_cents(4500).percent_bps(900).cents(), 405);
    }

    #[test]
    fn money_sum() {
        let total: Money = [100, 200, 300].map(Money::from_cents).into_iter().sum();
        assert_eq!(total.cents(), 600);
    }
}
