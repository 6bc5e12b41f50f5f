//! Per-channel credential sets.
//!
//! Each adapter takes its credentials by value at construction; there is no
//! process-wide settings object at this layer. An adapter runs simulated
//! when forced by the caller or when its required credentials are missing.

/// Shopify Admin API credentials.
#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    pub shop_url: String,
    pub access_token: String,
    pub api_version: String,
}

impl ShopifyConfig {
    /// True when every required credential is present.
    pub fn is_complete(&self) -> bool {
        !self.shop_url.is_empty() && !self.access_token.is_empty()
    }
}

/// Amazon SP-API credentials.
#[derive(Debug, Clone, Default)]
pub struct AmazonConfig {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub region: String,
    pub marketplace_id: String,
}

impl AmazonConfig {
    /// True when every required credential is present.
    pub fn is_complete(&self) -> bool {
        !self.refresh_token.is_empty()
            && !self.client_id.is_empty()
            && !self.client_secret.is_empty()
    }
}

/// eBay Trading API credentials.
#[derive(Debug, Clone, Default)]
pub struct EbayConfig {
    pub app_id: String,
    pub cert_id: String,
    pub dev_id: String,
    pub user_token: String,
    pub environment: String,
}

impl EbayConfig {
    /// True when every required credential is present.
    pub fn is_complete(&self) -> bool {
        !self.app_id.is_empty()
            && !self.cert_id.is_empty()
            && !self.dev_id.is_empty()
            && !self.user_token.is_empty()
    }
}

/// Etsy Open API credentials.
#[derive(Debug, Clone, Default)]
pub struct EtsyConfig {
    pub api_key: String,
    pub shop_id: String,
    pub access_token: String,
}

impl EtsyConfig {
    /// True when every required credential is present.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.shop_id.is_empty() && !self.access_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_configs_are_incomplete() {
        assert!(!ShopifyConfig::default().is_complete());
        assert!(!AmazonConfig::default().is_complete());
        assert!(!EbayConfig::default().is_complete());
        assert!(!EtsyConfig::default().is_complete());
    }

    #[test]
    fn full_shopify_config_is_complete() {
        let config = ShopifyConfig {
            shop_url: "example.myshopify.com".to_string(),
            access_token: "shpat_test".to_string(),
            api_version: "2024-01".to_string(),
        };
        assert!(config.is_complete());
    }

    #[test]
    fn partial_amazon_config_is_incomplete() {
        let config = AmazonConfig {
            refresh_token: "token".to_string(),
            ..Default::default()
        };
        assert!(!config.is_complete());
    }
}
