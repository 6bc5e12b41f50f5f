use async_trait::async_trait;
use common::Sku;

use crate::product::{ChangeLogEntry, Product};
use crate::Result;

/// Filter for catalog listings.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub offset: usize,
    pub limit: usize,
    /// Only products at or below their reorder point.
    pub low_stock_only: bool,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
            low_stock_only: false,
        }
    }
}

impl ProductFilter {
    /// Creates a filter with default paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of products to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of products to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Restricts the listing to products needing reorder.
    pub fn low_stock_only(mut self, low_stock_only: bool) -> Self {
        self.low_stock_only = low_stock_only;
        self
    }
}

/// Persistence seam for products and their change log.
///
/// Implementations must be thread-safe (Send + Sync). The store does not
/// serialize concurrent mutations of the same SKU; that is the ledger's job.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Loads a product by SKU.
    async fn get_product(&self, sku: &Sku) -> Result<Option<Product>>;

    /// Lists products ordered by SKU.
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>>;

    /// Inserts or replaces a product. Catalog import seam; counter
    /// mutations go through `commit_change` instead.
    async fn upsert_product(&self, product: Product) -> Result<()>;

    /// Persists updated counters and appends the audit entry atomically.
    ///
    /// Either both writes land or neither does; a failed log write must
    /// abort the counter update.
    async fn commit_change(&self, product: &Product, entry: &ChangeLogEntry) -> Result<()>;

    /// Returns up to `limit` change log entries for a SKU, newest first.
    async fn history(&self, sku: &Sku, limit: usize) -> Result<Vec<ChangeLogEntry>>;
}
