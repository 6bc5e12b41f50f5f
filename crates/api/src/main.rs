//! API server entry point.

use api::config::Settings;
use ledger::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<S: InventoryStore + 'static>(
    store: S,
    settings: Settings,
    metrics_handle: PrometheusHandle,
) {
    let state = api::create_default_state(store, settings.clone());

    if settings.demo_mode {
        api::seed_demo_catalog(state.ledger.store())
            .await
            .expect("failed to seed demo catalog");
        tracing::info!("demo catalog seeded");
    }

    // Pull cadence: periodically refresh orders from every channel.
    let orchestrator = state.orchestrator.clone();
    let interval = settings.sync_interval;
    let limit = settings.max_orders_per_sync;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let refresh = orchestrator.refresh_orders(limit, None).await;
            tracing::info!(
                orders = refresh.orders_synced,
                failures = refresh.failures.len(),
                "background order refresh"
            );
        }
    });

    let addr = settings.addr();
    tracing::info!(%addr, demo_mode = settings.demo_mode, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, api::create_app(state, metrics_handle))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let settings = Settings::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the ledger store and run
    match settings.database_url.clone() {
        Some(url) => {
            let pool = PgPool::connect(&url)
                .await
                .expect("failed to connect to database");
            let store = PostgresInventoryStore::new(pool);
            store.run_migrations().await.expect("migrations failed");
            serve(store, settings, metrics_handle).await;
        }
        None => {
            serve(InMemoryInventoryStore::new(), settings, metrics_handle).await;
        }
    }
}
