//! Inventory read, adjustment, reservation, and sync endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use common::{ChannelId, Sku};
use ledger::{ChangeLogEntry, InventoryStore, Product, ProductFilter};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListInventoryParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub low_stock: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryRequest {
    /// Absolute target quantity; the ledger computes the delta under its
    /// own per-SKU lock.
    pub quantity: u32,
    #[serde(default = "default_sync_channels")]
    pub sync_channels: bool,
}

fn default_sync_channels() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SyncInventoryParams {
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct LogsParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub quantity: u32,
    pub order_ref: String,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    pub quantity: u32,
    pub order_ref: String,
    pub reason: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity_available: u32,
    pub quantity_reserved: u32,
    pub reorder_point: u32,
    pub reorder_quantity: u32,
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
    pub needs_reorder: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let needs_reorder = product.needs_reorder();
        ProductResponse {
            sku: product.sku.to_string(),
            name: product.name,
            description: product.description,
            quantity_available: product.quantity_available,
            quantity_reserved: product.quantity_reserved,
            reorder_point: product.reorder_point,
            reorder_quantity: product.reorder_quantity,
            price_cents: product.price.map(|m| m.cents()),
            cost_cents: product.cost.map(|m| m.cents()),
            needs_reorder,
        }
    }
}

#[derive(Serialize)]
pub struct InventoryUpdateResponse {
    pub product: ProductResponse,
    pub channels_synced: BTreeMap<ChannelId, bool>,
}

#[derive(Serialize)]
pub struct SyncInventoryResponse {
    pub sku: String,
    pub quantity: u32,
    pub channels_synced: BTreeMap<ChannelId, bool>,
}

#[derive(Serialize)]
pub struct InventoryLogResponse {
    pub id: String,
    pub sku: String,
    pub change_type: String,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub quantity_change: i64,
    pub channel: Option<ChannelId>,
    pub order_ref: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ChangeLogEntry> for InventoryLogResponse {
    fn from(entry: ChangeLogEntry) -> Self {
        InventoryLogResponse {
            id: entry.id.to_string(),
            sku: entry.sku.to_string(),
            change_type: entry.change_type.to_string(),
            quantity_before: entry.quantity_before,
            quantity_after: entry.quantity_after,
            quantity_change: entry.quantity_change,
            channel: entry.channel,
            order_ref: entry.order_ref,
            reason: entry.reason,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ReserveResponse {
    pub reserved: bool,
}

#[derive(Serialize)]
pub struct ReleaseResponse {
    pub released: bool,
}

// -- Handlers --

/// GET /inventory — list catalog products.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListInventoryParams>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let filter = ProductFilter::new()
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .low_stock_only(params.low_stock.unwrap_or(false));

    let products = state.ledger.list_products(filter).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /inventory/{sku} — a single product with its reorder predicate.
#[tracing::instrument(skip(state))]
pub async fn get<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(sku): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let sku = Sku::new(sku);
    let product = state
        .ledger
        .product(&sku)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {sku} not found")))?;

    Ok(Json(product.into()))
}

/// PATCH /inventory/{sku} — set an absolute quantity, then optionally
/// propagate it to every channel. The ledger settles first.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(sku): Path<String>,
    Json(req): Json<UpdateInventoryRequest>,
) -> Result<Json<InventoryUpdateResponse>, ApiError> {
    let sku = Sku::new(sku);
    let push = state
        .orchestrator
        .push_inventory(&sku, req.quantity, req.sync_channels)
        .await?;

    Ok(Json(InventoryUpdateResponse {
        product: push.product.into(),
        channels_synced: push.channel_results,
    }))
}

/// POST /inventory/sync — broadcast a quantity to every channel without a
/// ledger mutation.
#[tracing::instrument(skip(state))]
pub async fn sync<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SyncInventoryParams>,
) -> Result<Json<SyncInventoryResponse>, ApiError> {
    let sku = Sku::new(params.sku);
    let push = state
        .orchestrator
        .broadcast_inventory(&sku, params.quantity)
        .await?;

    Ok(Json(SyncInventoryResponse {
        sku: sku.to_string(),
        quantity: params.quantity,
        channels_synced: push.channel_results,
    }))
}

/// GET /inventory/{sku}/logs — audit history, newest first.
#[tracing::instrument(skip(state))]
pub async fn logs<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(sku): Path<String>,
    Query(params): Query<LogsParams>,
) -> Result<Json<Vec<InventoryLogResponse>>, ApiError> {
    let sku = Sku::new(sku);

    // 404 for unknown SKUs rather than an empty history.
    state
        .ledger
        .product(&sku)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {sku} not found")))?;

    let entries = state
        .ledger
        .history(&sku, params.limit.unwrap_or(50))
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /inventory/{sku}/reserve — reserve stock for an order.
///
/// Insufficient stock is an ordinary `reserved: false` answer, not an
/// error.
#[tracing::instrument(skip(state, req))]
pub async fn reserve<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(sku): Path<String>,
    Json(req): Json<ReserveRequest>,
) -> Result<Json<ReserveResponse>, ApiError> {
    let sku = Sku::new(sku);
    let reserved = state
        .ledger
        .reserve(&sku, req.quantity, &req.order_ref)
        .await?;

    Ok(Json(ReserveResponse { reserved }))
}

/// POST /inventory/{sku}/release — release a reservation back to stock.
#[tracing::instrument(skip(state, req))]
pub async fn release<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(sku): Path<String>,
    Json(req): Json<ReleaseRequest>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let sku = Sku::new(sku);
    let reason = req.reason.as_deref().unwrap_or("order cancelled");
    let released = state
        .ledger
        .release(&sku, req.quantity, &req.order_ref, reason)
        .await?;

    Ok(Json(ReleaseResponse { released }))
}
