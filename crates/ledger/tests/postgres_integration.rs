//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p ledger --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::Sku;
use ledger::{
    ChangeContext, ChangeType, InventoryLedger, InventoryStore, PostgresInventoryStore, Product,
    ProductFilter,
};
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Run migrations once through a temporary pool
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_inventory_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn store() -> PostgresInventoryStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    PostgresInventoryStore::new(pool)
}

fn unique_sku(prefix: &str) -> Sku {
    Sku::new(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn upsert_and_get_product_round_trip() {
    let store = store().await;
    let sku = unique_sku("PG-WIDGET");

    let product = Product::new(sku.clone(), "Premium Widget")
        .with_quantity(25)
        .with_reorder_point(5)
        .with_price(common::Money::from_cents(2999));
    store.upsert_product(product.clone()).await.unwrap();

    let loaded = store.get_product(&sku).await.unwrap().unwrap();
    assert_eq!(loaded.sku, sku);
    assert_eq!(loaded.quantity_available, 25);
    assert_eq!(loaded.reorder_point, 5);
    assert_eq!(loaded.price, Some(common::Money::from_cents(2999)));
}

#[tokio::test]
async fn get_product_missing_is_none() {
    let store = store().await;
    let loaded = store.get_product(&unique_sku("PG-MISSING")).await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn commit_change_persists_counters_and_entry_together() {
    let store = store().await;
    let sku = unique_sku("PG-COMMIT");

    store
        .upsert_product(Product::new(sku.clone(), "Widget").with_quantity(10))
        .await
        .unwrap();

    let mut product = store.get_product(&sku).await.unwrap().unwrap();
    product.quantity_available = 7;
    product.quantity_reserved = 3;
    let entry = ledger::ChangeLogEntry::record(
        sku.clone(),
        ChangeType::Reservation,
        10,
        -3,
        ChangeContext::for_order("42", "order placed"),
    );
    store.commit_change(&product, &entry).await.unwrap();

    let loaded = store.get_product(&sku).await.unwrap().unwrap();
    assert_eq!(loaded.quantity_available, 7);
    assert_eq!(loaded.quantity_reserved, 3);

    let history = store.history(&sku, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, ChangeType::Reservation);
    assert_eq!(history[0].quantity_change, -3);
    assert_eq!(history[0].order_ref.as_deref(), Some("42"));
    assert!(history[0].is_balanced());
}

#[tokio::test]
async fn history_is_newest_first() {
    let store = store().await;
    let sku = unique_sku("PG-HIST");

    store
        .upsert_product(Product::new(sku.clone(), "Widget"))
        .await
        .unwrap();

    let mut before = 0i64;
    for delta in [5i64, 10, -3] {
        let mut product = store.get_product(&sku).await.unwrap().unwrap();
        product.quantity_available = (before + delta).max(0) as u32;
        let entry = ledger::ChangeLogEntry::record(
            sku.clone(),
            ChangeType::Adjustment,
            before,
            delta,
            ChangeContext::none(),
        );
        store.commit_change(&product, &entry).await.unwrap();
        before += delta;
    }

    let history = store.history(&sku, 2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].quantity_change, -3);
    assert_eq!(history[1].quantity_change, 10);
}

#[tokio::test]
async fn ledger_operations_work_end_to_end_on_postgres() {
    let store = store().await;
    let sku = unique_sku("PG-LEDGER");

    store
        .upsert_product(Product::new(sku.clone(), "Widget").with_quantity(10))
        .await
        .unwrap();

    let ledger = InventoryLedger::new(store);

    assert!(ledger.reserve(&sku, 7, "42").await.unwrap());
    assert!(!ledger.reserve(&sku, 5, "43").await.unwrap());
    assert!(ledger.release(&sku, 7, "42", "cancelled").await.unwrap());

    let product = ledger.product(&sku).await.unwrap().unwrap();
    assert_eq!(product.quantity_available, 10);
    assert_eq!(product.quantity_reserved, 0);

    let history = ledger.history(&sku, 10).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn list_products_low_stock_filter() {
    let store = store().await;
    let low = unique_sku("PG-LOW");
    let high = unique_sku("PG-HIGH");

    store
        .upsert_product(Product::new(low.clone(), "Low").with_quantity(2))
        .await
        .unwrap();
    store
        .upsert_product(Product::new(high.clone(), "High").with_quantity(500))
        .await
        .unwrap();

    let listed = store
        .list_products(ProductFilter::new().low_stock_only(true).limit(1000))
        .await
        .unwrap();

    assert!(listed.iter().any(|p| p.sku == low));
    assert!(listed.iter().all(|p| p.sku != high));
}
