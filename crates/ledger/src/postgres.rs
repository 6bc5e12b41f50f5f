use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ChannelId, Money, Sku};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::product::{ChangeLogEntry, ChangeType, Product};
use crate::store::{InventoryStore, ProductFilter};
use crate::{LedgerError, Result};

/// PostgreSQL-backed inventory store.
#[derive(Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    /// Creates a new PostgreSQL inventory store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            sku: Sku::new(row.try_get::<String, _>("sku")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            quantity_available: row.try_get::<i64, _>("quantity_available")?.max(0) as u32,
            quantity_reserved: row.try_get::<i64, _>("quantity_reserved")?.max(0) as u32,
            reorder_point: row.try_get::<i64, _>("reorder_point")?.max(0) as u32,
            reorder_quantity: row.try_get::<i64, _>("reorder_quantity")?.max(0) as u32,
            cost: row
                .try_get::<Option<i64>, _>("cost_cents")?
                .map(Money::from_cents),
            price: row
                .try_get::<Option<i64>, _>("price_cents")?
                .map(Money::from_cents),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_entry(row: PgRow) -> Result<ChangeLogEntry> {
        let change_type: ChangeType = row
            .try_get::<String, _>("change_type")?
            .parse()
            .map_err(|e: String| LedgerError::Database(sqlx::Error::Decode(e.into())))?;
        let channel = row
            .try_get::<Option<String>, _>("channel")?
            .map(|c| c.parse::<ChannelId>())
            .transpose()
            .map_err(|e| LedgerError::Database(sqlx::Error::Decode(e.to_string().into())))?;

        Ok(ChangeLogEntry {
            id: row.try_get::<Uuid, _>("id")?,
            sku: Sku::new(row.try_get::<String, _>("sku")?),
            change_type,
            quantity_before: row.try_get("quantity_before")?,
            quantity_after: row.try_get("quantity_after")?,
            quantity_change: row.try_get("quantity_change")?,
            channel,
            order_ref: row.try_get("order_ref")?,
            reason: row.try_get("reason")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn get_product(&self, sku: &Sku) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT sku, name, description, quantity_available, quantity_reserved,
                   reorder_point, reorder_quantity, cost_cents, price_cents,
                   created_at, updated_at
            FROM products
            WHERE sku = $1
            "#,
        )
        .bind(sku.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let sql = if filter.low_stock_only {
            r#"
            SELECT sku, name, description, quantity_available, quantity_reserved,
                   reorder_point, reorder_quantity, cost_cents, price_cents,
                   created_at, updated_at
            FROM products
            WHERE quantity_available <= reorder_point
            ORDER BY sku ASC
            LIMIT $1 OFFSET $2
            "#
        } else {
            r#"
            SELECT sku, name, description, quantity_available, quantity_reserved,
                   reorder_point, reorder_quantity, cost_cents, price_cents,
                   created_at, updated_at
            FROM products
            ORDER BY sku ASC
            LIMIT $1 OFFSET $2
            "#
        };

        let rows = sqlx::query(sql)
            .bind(filter.limit as i64)
            .bind(filter.offset as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn upsert_product(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (sku, name, description, quantity_available, quantity_reserved,
                                  reorder_point, reorder_quantity, cost_cents, price_cents,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (sku) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                quantity_available = EXCLUDED.quantity_available,
                quantity_reserved = EXCLUDED.quantity_reserved,
                reorder_point = EXCLUDED.reorder_point,
                reorder_quantity = EXCLUDED.reorder_quantity,
                cost_cents = EXCLUDED.cost_cents,
                price_cents = EXCLUDED.price_cents,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(product.sku.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity_available as i64)
        .bind(product.quantity_reserved as i64)
        .bind(product.reorder_point as i64)
        .bind(product.reorder_quantity as i64)
        .bind(product.cost.map(|m| m.cents()))
        .bind(product.price.map(|m| m.cents()))
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn commit_change(&self, product: &Product, entry: &ChangeLogEntry) -> Result<()> {
        // Counter update and audit entry are one transaction; a failed log
        // write rolls the counters back with it.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE products
            SET quantity_available = $2, quantity_reserved = $3, updated_at = $4
            WHERE sku = $1
            "#,
        )
        .bind(product.sku.as_str())
        .bind(product.quantity_available as i64)
        .bind(product.quantity_reserved as i64)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO inventory_logs (id, sku, change_type, quantity_before, quantity_after,
                                        quantity_change, channel, order_ref, reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id)
        .bind(entry.sku.as_str())
        .bind(entry.change_type.as_str())
        .bind(entry.quantity_before)
        .bind(entry.quantity_after)
        .bind(entry.quantity_change)
        .bind(entry.channel.map(|c| c.as_str()))
        .bind(&entry.order_ref)
        .bind(&entry.reason)
        .bind(entry.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn history(&self, sku: &Sku, limit: usize) -> Result<Vec<ChangeLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sku, change_type, quantity_before, quantity_after,
                   quantity_change, channel, order_ref, reason, created_at
            FROM inventory_logs
            WHERE sku = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(sku.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_entry).collect()
    }
}
