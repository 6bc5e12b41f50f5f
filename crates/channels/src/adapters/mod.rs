//! One adapter per configured sales channel.

pub mod amazon;
pub mod ebay;
pub mod etsy;
pub mod shopify;

pub use amazon::AmazonChannel;
pub use ebay::EbayChannel;
pub use etsy::EtsyChannel;
pub use shopify::ShopifyChannel;
