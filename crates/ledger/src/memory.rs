use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::Sku;
use tokio::sync::RwLock;

use crate::product::{ChangeLogEntry, Product};
use crate::store::{InventoryStore, ProductFilter};
use crate::Result;

#[derive(Default)]
struct State {
    products: HashMap<Sku, Product>,
    log: Vec<ChangeLogEntry>,
}

/// In-memory inventory store for tests and demo deployments.
///
/// Provides the same interface as the PostgreSQL implementation; the
/// counter update and the log append happen under one write lock, so a
/// change is never half-visible.
#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryInventoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of log entries across all SKUs.
    pub async fn log_count(&self) -> usize {
        self.state.read().await.log.len()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn get_product(&self, sku: &Sku) -> Result<Option<Product>> {
        Ok(self.state.read().await.products.get(sku).cloned())
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| !filter.low_stock_only || p.needs_reorder())
            .cloned()
            .collect();
        products.sort_by(|a, b| a.sku.cmp(&b.sku));

        Ok(products
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn upsert_product(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().await;
        state.products.insert(product.sku.clone(), product);
        Ok(())
    }

    async fn commit_change(&self, product: &Product, entry: &ChangeLogEntry) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .products
            .insert(product.sku.clone(), product.clone());
        state.log.push(entry.clone());
        Ok(())
    }

    async fn history(&self, sku: &Sku, limit: usize) -> Result<Vec<ChangeLogEntry>> {
        let state = self.state.read().await;
        Ok(state
            .log
            .iter()
            .rev()
            .filter(|e| &e.sku == sku)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ChangeContext, ChangeType};

    #[tokio::test]
    async fn upsert_and_get_product() {
        let store = InMemoryInventoryStore::new();
        let product = Product::new("WIDGET-001", "Premium Widget").with_quantity(10);

        store.upsert_product(product.clone()).await.unwrap();

        let loaded = store
            .get_product(&Sku::new("WIDGET-001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, product);

        let missing = store.get_product(&Sku::new("NOPE")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn list_products_is_sorted_and_paged() {
        let store = InMemoryInventoryStore::new();
        for sku in ["C-3", "A-1", "B-2"] {
            store
                .upsert_product(Product::new(sku, "Thing").with_quantity(50))
                .await
                .unwrap();
        }

        let all = store.list_products(ProductFilter::new()).await.unwrap();
        let skus: Vec<_> = all.iter().map(|p| p.sku.as_str().to_string()).collect();
        assert_eq!(skus, ["A-1", "B-2", "C-3"]);

        let page = store
            .list_products(ProductFilter::new().offset(1).limit(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].sku.as_str(), "B-2");
    }

    #[tokio::test]
    async fn list_products_low_stock_filter() {
        let store = InMemoryInventoryStore::new();
        store
            .upsert_product(Product::new("LOW-1", "Low").with_quantity(5))
            .await
            .unwrap();
        store
            .upsert_product(Product::new("HIGH-1", "High").with_quantity(500))
            .await
            .unwrap();

        let low = store
            .list_products(ProductFilter::new().low_stock_only(true))
            .await
            .unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku.as_str(), "LOW-1");
    }

    #[tokio::test]
    async fn commit_change_writes_product_and_one_entry() {
        let store = InMemoryInventoryStore::new();
        let product = Product::new("WIDGET-001", "Premium Widget").with_quantity(10);
        store.upsert_product(product.clone()).await.unwrap();

        let updated = product.clone().with_quantity(7);
        let entry = ChangeLogEntry::record(
            Sku::new("WIDGET-001"),
            ChangeType::Sale,
            10,
            -3,
            ChangeContext::none(),
        );
        store.commit_change(&updated, &entry).await.unwrap();

        let loaded = store
            .get_product(&Sku::new("WIDGET-001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.quantity_available, 7);
        assert_eq!(store.log_count().await, 1);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let store = InMemoryInventoryStore::new();
        let sku = Sku::new("WIDGET-001");
        store
            .upsert_product(Product::new("WIDGET-001", "Premium Widget"))
            .await
            .unwrap();

        for delta in [5, -2, 10] {
            let before = 0;
            let entry = ChangeLogEntry::record(
                sku.clone(),
                ChangeType::Adjustment,
                before,
                delta,
                ChangeContext::none(),
            );
            let product = Product::new("WIDGET-001", "Premium Widget");
            store.commit_change(&product, &entry).await.unwrap();
        }

        let history = store.history(&sku, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].quantity_change, 10);
        assert_eq!(history[1].quantity_change, -2);
    }
}
