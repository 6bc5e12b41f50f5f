//! Application configuration loaded from environment variables.

use std::time::Duration;

use channels::{AmazonConfig, EbayConfig, EtsyConfig, ShopifyConfig};

/// Server and hub configuration with sensible defaults.
///
/// Constructed once at startup and passed into the constructors that need
/// it; there is no process-wide singleton. Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DEMO_MODE` — force all adapters into simulated mode (default: `true`)
/// - `DATABASE_URL` — when set, the ledger uses PostgreSQL
/// - `DEFAULT_PAGE_LIMIT` — per-channel order page size (default: 50)
/// - `CHANNEL_TIMEOUT_SECS` — bound on every channel call (default: 10)
/// - `SYNC_INTERVAL_MINUTES` — background refresh cadence (default: 5)
/// - `MAX_ORDERS_PER_SYNC` — per-channel limit for forced syncs (default: 100)
/// - per-channel credentials (`SHOPIFY_*`, `AMAZON_*`, `EBAY_*`, `ETSY_*`)
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub demo_mode: bool,
    pub database_url: Option<String>,
    pub default_page_limit: usize,
    pub channel_timeout: Duration,
    pub sync_interval: Duration,
    pub max_orders_per_sync: usize,
    pub shopify: ShopifyConfig,
    pub amazon: AmazonConfig,
    pub ebay: EbayConfig,
    pub etsy: EtsyConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Settings {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8000),
            log_level: env_or("RUST_LOG", "info"),
            demo_mode: env_parse("DEMO_MODE", true),
            database_url: std::env::var("DATABASE_URL").ok(),
            default_page_limit: env_parse("DEFAULT_PAGE_LIMIT", 50),
            channel_timeout: Duration::from_secs(env_parse("CHANNEL_TIMEOUT_SECS", 10)),
            sync_interval: Duration::from_secs(env_parse("SYNC_INTERVAL_MINUTES", 5u64) * 60),
            max_orders_per_sync: env_parse("MAX_ORDERS_PER_SYNC", 100),
            shopify: ShopifyConfig {
                shop_url: env_or("SHOPIFY_SHOP_URL", ""),
                access_token: env_or("SHOPIFY_ACCESS_TOKEN", ""),
                api_version: env_or("SHOPIFY_API_VERSION", "2024-01"),
            },
            amazon: AmazonConfig {
                refresh_token: env_or("AMAZON_REFRESH_TOKEN", ""),
                client_id: env_or("AMAZON_CLIENT_ID", ""),
                client_secret: env_or("AMAZON_CLIENT_SECRET", ""),
                region: env_or("AMAZON_REGION", "us-east-1"),
                marketplace_id: env_or("AMAZON_MARKETPLACE_ID", "ATVPDKIKX0DER"),
            },
            ebay: EbayConfig {
                app_id: env_or("EBAY_APP_ID", ""),
                cert_id: env_or("EBAY_CERT_ID", ""),
                dev_id: env_or("EBAY_DEV_ID", ""),
                user_token: env_or("EBAY_USER_TOKEN", ""),
                environment: env_or("EBAY_ENVIRONMENT", "production"),
            },
            etsy: EtsyConfig {
                api_key: env_or("ETSY_API_KEY", ""),
                shop_id: env_or("ETSY_SHOP_ID", ""),
                access_token: env_or("ETSY_ACCESS_TOKEN", ""),
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            demo_mode: true,
            database_url: None,
            default_page_limit: 50,
            channel_timeout: Duration::from_secs(10),
            sync_interval: Duration::from_secs(300),
            max_orders_per_sync: 100,
            shopify: ShopifyConfig::default(),
            amazon: AmazonConfig::default(),
            ebay: EbayConfig::default(),
            etsy: EtsyConfig::default(),
        }
    }
}
