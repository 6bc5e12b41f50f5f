//! The inventory ledger service.
//!
//! Serializes mutations per SKU: the read-modify-write-log sequence for one
//! SKU runs under that SKU's async mutex, so concurrent reservations cannot
//! both observe sufficient stock. Different SKUs proceed in parallel. No
//! channel I/O ever happens under a ledger lock; propagation to channels is
//! a separate step owned by the orchestrator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use common::Sku;

use crate::error::LedgerError;
use crate::product::{ChangeContext, ChangeLogEntry, ChangeType, Product};
use crate::store::{InventoryStore, ProductFilter};
use crate::Result;

/// Service owning all counter mutations for the product catalog.
pub struct InventoryLedger<S: InventoryStore> {
    store: S,
    locks: Mutex<HashMap<Sku, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: InventoryStore> InventoryLedger<S> {
    /// Creates a ledger over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn sku_lock(&self, sku: &Sku) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(sku.clone()).or_default().clone()
    }

    /// Applies a signed delta to a SKU's available quantity.
    ///
    /// The stored counter clamps at zero; the audit entry records the
    /// requested delta arithmetic either way. Returns the updated product.
    #[tracing::instrument(skip(self, context))]
    pub async fn adjust(
        &self,
        sku: &Sku,
        delta: i64,
        change_type: ChangeType,
        context: ChangeContext,
    ) -> Result<Product> {
        let lock = self.sku_lock(sku);
        let _guard = lock.lock().await;

        let product = self
            .store
            .get_product(sku)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(sku.clone()))?;

        self.apply_available_delta(product, delta, change_type, context)
            .await
    }

    /// Sets a SKU's available quantity to an absolute target.
    ///
    /// The delta is computed under the SKU lock, so an interleaved mutation
    /// cannot slip between the read and the write.
    #[tracing::instrument(skip(self, context))]
    pub async fn set_quantity(
        &self,
        sku: &Sku,
        target: u32,
        change_type: ChangeType,
        context: ChangeContext,
    ) -> Result<Product> {
        let lock = self.sku_lock(sku);
        let _guard = lock.lock().await;

        let product = self
            .store
            .get_product(sku)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(sku.clone()))?;

        let delta = target as i64 - product.quantity_available as i64;
        self.apply_available_delta(product, delta, change_type, context)
            .await
    }

    /// Moves quantity from available to reserved for an open order.
    ///
    /// Returns `Ok(false)` without mutating or logging anything when the
    /// available quantity is insufficient; that is an expected business
    /// outcome, not a fault.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, sku: &Sku, quantity: u32, order_ref: &str) -> Result<bool> {
        let lock = self.sku_lock(sku);
        let _guard = lock.lock().await;

        let mut product = self
            .store
            .get_product(sku)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(sku.clone()))?;

        if product.quantity_available < quantity {
            metrics::counter!("reservations_rejected_total").increment(1);
            tracing::info!(%sku, quantity, available = product.quantity_available, "reservation refused");
            return Ok(false);
        }

        let before = product.quantity_available as i64;
        product.quantity_available -= quantity;
        product.quantity_reserved += quantity;
        product.updated_at = Utc::now();

        let entry = ChangeLogEntry::record(
            sku.clone(),
            ChangeType::Reservation,
            before,
            -(quantity as i64),
            ChangeContext::for_order(order_ref, "order placed"),
        );

        self.store.commit_change(&product, &entry).await?;
        metrics::counter!("inventory_mutations_total", "change_type" => "reservation").increment(1);

        Ok(true)
    }

    /// Releases a reservation back to available stock (cancellation path).
    ///
    /// The reserved counter clamps at zero if the release exceeds what was
    /// reserved.
    #[tracing::instrument(skip(self))]
    pub async fn release(
        &self,
        sku: &Sku,
        quantity: u32,
        order_ref: &str,
        reason: &str,
    ) -> Result<bool> {
        let lock = self.sku_lock(sku);
        let _guard = lock.lock().await;

        let mut product = self
            .store
            .get_product(sku)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(sku.clone()))?;

        let before = product.quantity_available as i64;
        product.quantity_available += quantity;
        product.quantity_reserved = product.quantity_reserved.saturating_sub(quantity);
        product.updated_at = Utc::now();

        let entry = ChangeLogEntry::record(
            sku.clone(),
            ChangeType::Release,
            before,
            quantity as i64,
            ChangeContext::for_order(order_ref, reason),
        );

        self.store.commit_change(&product, &entry).await?;
        metrics::counter!("inventory_mutations_total", "change_type" => "release").increment(1);

        Ok(true)
    }

    /// True when the SKU's available quantity has fallen to its reorder
    /// point. Pure read.
    pub async fn needs_reorder(&self, sku: &Sku) -> Result<bool> {
        let product = self
            .store
            .get_product(sku)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(sku.clone()))?;
        Ok(product.needs_reorder())
    }

    /// Returns up to `limit` audit entries for a SKU, newest first.
    pub async fn history(&self, sku: &Sku, limit: usize) -> Result<Vec<ChangeLogEntry>> {
        self.store.history(sku, limit).await
    }

    /// Loads a product by SKU.
    pub async fn product(&self, sku: &Sku) -> Result<Option<Product>> {
        self.store.get_product(sku).await
    }

    /// Lists catalog products.
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        self.store.list_products(filter).await
    }

    async fn apply_available_delta(
        &self,
        mut product: Product,
        delta: i64,
        change_type: ChangeType,
        context: ChangeContext,
    ) -> Result<Product> {
        let before = product.quantity_available as i64;
        product.quantity_available = (before + delta).max(0) as u32;
        product.updated_at = Utc::now();

        let entry = ChangeLogEntry::record(product.sku.clone(), change_type, before, delta, context);

        self.store.commit_change(&product, &entry).await?;
        metrics::counter!("inventory_mutations_total", "change_type" => change_type.as_str())
            .increment(1);
        tracing::debug!(sku = %product.sku, delta, available = product.quantity_available, "inventory adjusted");

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryInventoryStore;

    async fn ledger_with(
        sku: &str,
        quantity: u32,
    ) -> InventoryLedger<InMemoryInventoryStore> {
        let store = InMemoryInventoryStore::new();
        store
            .upsert_product(Product::new(sku, "Premium Widget").with_quantity(quantity))
            .await
            .unwrap();
        InventoryLedger::new(store)
    }

    #[tokio::test]
    async fn adjust_updates_counter_and_logs_once() {
        let ledger = ledger_with("WIDGET-001", 10).await;
        let sku = Sku::new("WIDGET-001");

        let product = ledger
            .adjust(&sku, -3, ChangeType::Sale, ChangeContext::none())
            .await
            .unwrap();
        assert_eq!(product.quantity_available, 7);

        let history = ledger.history(&sku, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].quantity_before, 10);
        assert_eq!(history[0].quantity_after, 7);
        assert_eq!(history[0].quantity_change, -3);
        assert!(history[0].is_balanced());
    }

    #[tokio::test]
    async fn adjust_clamps_counter_but_logs_requested_delta() {
        let ledger = ledger_with("WIDGET-001", 5).await;
        let sku = Sku::new("WIDGET-001");

        let product = ledger
            .adjust(&sku, -10, ChangeType::Sale, ChangeContext::none())
            .await
            .unwrap();
        assert_eq!(product.quantity_available, 0);

        let history = ledger.history(&sku, 10).await.unwrap();
        assert_eq!(history[0].quantity_before, 5);
        assert_eq!(history[0].quantity_change, -10);
        assert_eq!(history[0].quantity_after, -5);
        assert!(history[0].is_balanced());
    }

    #[tokio::test]
    async fn adjust_unknown_sku_is_not_found() {
        let ledger = InventoryLedger::new(InMemoryInventoryStore::new());
        let result = ledger
            .adjust(
                &Sku::new("NOPE"),
                1,
                ChangeType::Restock,
                ChangeContext::none(),
            )
            .await;
        assert!(matches!(result, Err(LedgerError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn set_quantity_computes_delta_from_current() {
        let ledger = ledger_with("WIDGET-001", 10).await;
        let sku = Sku::new("WIDGET-001");

        let product = ledger
            .set_quantity(&sku, 25, ChangeType::Adjustment, ChangeContext::none())
            .await
            .unwrap();
        assert_eq!(product.quantity_available, 25);

        let product = ledger
            .set_quantity(&sku, 5, ChangeType::Adjustment, ChangeContext::none())
            .await
            .unwrap();
        assert_eq!(product.quantity_available, 5);

        let history = ledger.history(&sku, 10).await.unwrap();
        assert_eq!(history[0].quantity_change, -20);
        assert_eq!(history[1].quantity_change, 15);
    }

    #[tokio::test]
    async fn reserve_release_scenario() {
        let ledger = ledger_with("WIDGET-001", 10).await;
        let sku = Sku::new("WIDGET-001");

        // reserve 7 of 10
        assert!(ledger.reserve(&sku, 7, "42").await.unwrap());
        let product = ledger.product(&sku).await.unwrap().unwrap();
        assert_eq!(product.quantity_available, 3);
        assert_eq!(product.quantity_reserved, 7);

        // 5 more exceed the remaining 3; nothing changes, nothing is logged
        assert!(!ledger.reserve(&sku, 5, "43").await.unwrap());
        let product = ledger.product(&sku).await.unwrap().unwrap();
        assert_eq!(product.quantity_available, 3);
        assert_eq!(product.quantity_reserved, 7);

        // cancellation releases the full reservation
        assert!(ledger.release(&sku, 7, "42", "cancelled").await.unwrap());
        let product = ledger.product(&sku).await.unwrap().unwrap();
        assert_eq!(product.quantity_available, 10);
        assert_eq!(product.quantity_reserved, 0);

        // one entry per successful mutating call, none for the refusal
        let history = ledger.history(&sku, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].change_type, ChangeType::Release);
        assert_eq!(history[0].quantity_change, 7);
        assert_eq!(history[1].change_type, ChangeType::Reservation);
        assert_eq!(history[1].quantity_change, -7);
        assert!(history.iter().all(ChangeLogEntry::is_balanced));
    }

    #[tokio::test]
    async fn reserve_unknown_sku_is_not_found() {
        let ledger = InventoryLedger::new(InMemoryInventoryStore::new());
        let result = ledger.reserve(&Sku::new("NOPE"), 1, "42").await;
        assert!(matches!(result, Err(LedgerError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn release_clamps_reserved_at_zero() {
        let ledger = ledger_with("WIDGET-001", 10).await;
        let sku = Sku::new("WIDGET-001");

        assert!(
            ledger
                .release(&sku, 4, "42", "manual correction")
                .await
                .unwrap()
        );

        let product = ledger.product(&sku).await.unwrap().unwrap();
        assert_eq!(product.quantity_available, 14);
        assert_eq!(product.quantity_reserved, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_never_oversell() {
        let ledger = Arc::new(ledger_with("WIDGET-001", 10).await);
        let sku = Sku::new("WIDGET-001");

        let mut handles = Vec::new();
        for task in 0..8 {
            let ledger = Arc::clone(&ledger);
            let sku = sku.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .reserve(&sku, 3, &format!("order-{task}"))
                    .await
                    .unwrap()
            }));
        }

        let mut successes: u32 = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        // 8 tasks x 3 units against 10 available: at most 3 can win.
        assert!(successes <= 3);

        let product = ledger.product(&sku).await.unwrap().unwrap();
        assert_eq!(product.quantity_reserved, successes * 3);
        assert_eq!(product.quantity_available, 10 - successes * 3);

        let history = ledger.history(&sku, 20).await.unwrap();
        assert_eq!(history.len(), successes as usize);
    }

    #[tokio::test]
    async fn ledger_conservation_under_mixed_operations() {
        let ledger = ledger_with("WIDGET-001", 0).await;
        let sku = Sku::new("WIDGET-001");

        ledger
            .adjust(&sku, 20, ChangeType::Restock, ChangeContext::none())
            .await
            .unwrap();
        ledger.reserve(&sku, 5, "42").await.unwrap();
        ledger.release(&sku, 2, "42", "partial cancel").await.unwrap();
        ledger
            .adjust(&sku, -4, ChangeType::Sale, ChangeContext::none())
            .await
            .unwrap();

        // Reservations and releases net to zero internal movement; only the
        // external restock and sale change the total.
        let product = ledger.product(&sku).await.unwrap().unwrap();
        assert_eq!(
            product.quantity_available + product.quantity_reserved,
            (20 - 4) as u32
        );
    }

    #[tokio::test]
    async fn needs_reorder_reads_derived_predicate() {
        let ledger = ledger_with("WIDGET-001", 50).await;
        let sku = Sku::new("WIDGET-001");

        assert!(!ledger.needs_reorder(&sku).await.unwrap());

        ledger
            .set_quantity(&sku, 10, ChangeType::Sync, ChangeContext::none())
            .await
            .unwrap();
        assert!(ledger.needs_reorder(&sku).await.unwrap());
    }

    #[tokio::test]
    async fn history_respects_limit_and_order() {
        let ledger = ledger_with("WIDGET-001", 0).await;
        let sku = Sku::new("WIDGET-001");

        for delta in [1, 2, 3] {
            ledger
                .adjust(&sku, delta, ChangeType::Restock, ChangeContext::none())
                .await
                .unwrap();
        }

        let history = ledger.history(&sku, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].quantity_change, 3);
        assert_eq!(history[1].quantity_change, 2);
    }

    #[tokio::test]
    async fn change_context_is_preserved_in_log() {
        let ledger = ledger_with("WIDGET-001", 10).await;
        let sku = Sku::new("WIDGET-001");

        ledger
            .adjust(
                &sku,
                -1,
                ChangeType::Sale,
                ChangeContext::for_order("99", "storefront sale")
                    .on_channel(common::ChannelId::Shopify),
            )
            .await
            .unwrap();

        let history = ledger.history(&sku, 1).await.unwrap();
        assert_eq!(history[0].order_ref.as_deref(), Some("99"));
        assert_eq!(history[0].reason.as_deref(), Some("storefront sale"));
        assert_eq!(history[0].channel, Some(common::ChannelId::Shopify));
    }
}
