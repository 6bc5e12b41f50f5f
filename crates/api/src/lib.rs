//! HTTP API server for the multi-channel order and inventory hub.
//!
//! Provides REST endpoints over the aggregation engine, the inventory
//! ledger, and the sync orchestrator, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use aggregator::OrderAggregator;
use axum::routing::{get, post};
use axum::Router;
use channels::{AmazonChannel, ChannelClient, EbayChannel, EtsyChannel, ShopifyChannel};
use common::Money;
use ledger::{InventoryLedger, InventoryStore, Product};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::SyncOrchestrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Settings;
use routes::AppState;

/// Builds the four channel adapters from the settings.
///
/// Each adapter decides live vs simulated from its own credentials; the
/// global demo flag forces all of them into simulated mode.
pub fn build_adapters(settings: &Settings) -> Vec<Arc<dyn ChannelClient>> {
    vec![
        Arc::new(ShopifyChannel::new(
            settings.shopify.clone(),
            settings.demo_mode,
        )),
        Arc::new(AmazonChannel::new(
            settings.amazon.clone(),
            settings.demo_mode,
        )),
        Arc::new(EbayChannel::new(settings.ebay.clone(), settings.demo_mode)),
        Arc::new(EtsyChannel::new(settings.etsy.clone(), settings.demo_mode)),
    ]
}

/// Creates the default application state: adapters, aggregator, ledger,
/// and orchestrator wired together over the given store.
pub fn create_default_state<S: InventoryStore + 'static>(
    store: S,
    settings: Settings,
) -> Arc<AppState<S>> {
    let adapters = build_adapters(&settings);
    let aggregator = Arc::new(OrderAggregator::new(adapters, settings.channel_timeout));
    let ledger = Arc::new(InventoryLedger::new(store));
    let orchestrator = Arc::new(SyncOrchestrator::new(
        Arc::clone(&ledger),
        Arc::clone(&aggregator),
    ));

    Arc::new(AppState {
        ledger,
        aggregator,
        orchestrator,
        settings,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: InventoryStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/sync", post(routes::orders::sync::<S>))
        .route(
            "/orders/{channel}/{id}",
            get(routes::orders::get::<S>).patch(routes::orders::update::<S>),
        )
        .route("/inventory", get(routes::inventory::list::<S>))
        .route("/inventory/sync", post(routes::inventory::sync::<S>))
        .route(
            "/inventory/{sku}",
            get(routes::inventory::get::<S>).patch(routes::inventory::update::<S>),
        )
        .route("/inventory/{sku}/logs", get(routes::inventory::logs::<S>))
        .route(
            "/inventory/{sku}/reserve",
            post(routes::inventory::reserve::<S>),
        )
        .route(
            "/inventory/{sku}/release",
            post(routes::inventory::release::<S>),
        )
        .route("/channels", get(routes::channels::list::<S>))
        .route(
            "/channels/{channel}/health",
            get(routes::channels::health::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Seeds a small product catalog so the inventory routes are exercisable
/// in demo mode. Catalog import is otherwise out of band.
pub async fn seed_demo_catalog<S: InventoryStore>(store: &S) -> ledger::Result<()> {
    let catalog = [
        ("WIDGET-001", "Premium Widget", 120, 20, 2_999),
        ("GADGET-042", "Smart Gadget Pro", 45, 10, 14_999),
        ("TOOL-123", "Professional Tool Set", 8, 10, 8_999),
        ("ACC-999", "Deluxe Accessory Kit", 60, 15, 3_999),
        ("AMZ-ELECT-123", "Wireless Earbuds", 200, 25, 7_999),
        ("EBAY-WATCH-999", "Designer Watch", 5, 10, 29_999),
        ("ETSY-CRAFT-001", "Handmade Ceramic Mug", 30, 10, 2_499),
    ];

    for (sku, name, quantity, reorder_point, price_cents) in catalog {
        store
            .upsert_product(
                Product::new(sku, name)
                    .with_quantity(quantity)
                    .with_reorder_point(reorder_point)
                    .with_price(Money::from_cents(price_cents)),
            )
            .await?;
    }

    Ok(())
}
