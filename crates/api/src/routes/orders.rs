//! Aggregated order read and status sync endpoints.

use std::sync::Arc;

use aggregator::ChannelFailure;
use axum::extract::{Path, Query, State};
use axum::Json;
use channels::Order;
use chrono::{DateTime, Utc};
use common::ChannelId;
use ledger::InventoryStore;
use orchestrator::OrderRefresh;
use serde::{Deserialize, Serialize};

use super::{parse_channel, parse_status, AppState};
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    /// Comma-separated channel subset, e.g. `shopify,etsy`.
    pub channel: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SyncOrdersParams {
    pub channel: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub variant: Option<String>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub channel: ChannelId,
    pub order_number: Option<String>,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub items: Vec<OrderLineResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .lines
            .iter()
            .map(|line| OrderLineResponse {
                sku: line.sku.to_string(),
                name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price.cents(),
                total_price_cents: line.total_price.cents(),
                variant: line.variant.clone(),
            })
            .collect();

        OrderResponse {
            id: order.id,
            channel: order.channel,
            order_number: order.order_number,
            status: order.status.to_string(),
            order_date: order.placed_at,
            customer_name: order.customer.name,
            customer_email: order.customer.email,
            subtotal_cents: order.subtotal.cents(),
            tax_cents: order.tax.cents(),
            shipping_cents: order.shipping_cost.cents(),
            total_cents: order.total.cents(),
            currency: order.currency,
            tracking_number: order.tracking_number,
            carrier: order.carrier,
            items,
        }
    }
}

#[derive(Serialize)]
pub struct OrdersListResponse {
    pub orders: Vec<OrderResponse>,
    /// Channels that contributed nothing this pass, with the reason.
    pub failures: Vec<ChannelFailure>,
}

#[derive(Serialize)]
pub struct UpdateOrderResponse {
    pub channel: ChannelId,
    pub order_id: String,
    pub status: String,
    pub updated: bool,
}

// -- Handlers --

fn parse_channel_list(raw: &Option<String>) -> Result<Option<Vec<ChannelId>>, ApiError> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_channel)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

/// GET /orders — aggregated orders across channels, newest first.
///
/// Partial results are a success; failed channels are listed out of band.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<OrdersListResponse>, ApiError> {
    let subset = parse_channel_list(&params.channel)?;
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let limit = params.limit.unwrap_or(state.settings.default_page_limit);

    let aggregated = state.aggregator.get_all_orders(limit, subset.as_deref()).await;

    let orders = aggregated
        .orders
        .into_iter()
        .filter(|o| status.is_none_or(|s| o.status == s))
        .map(OrderResponse::from)
        .collect();

    Ok(Json(OrdersListResponse {
        orders,
        failures: aggregated.failures,
    }))
}

/// GET /orders/{channel}/{id} — a single order from one channel.
#[tracing::instrument(skip(state))]
pub async fn get<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((channel, order_id)): Path<(String, String)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let channel = parse_channel(&channel)?;

    let order = state
        .aggregator
        .get_order(channel, &order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {order_id} not found on {channel}")))?;

    Ok(Json(order.into()))
}

/// PATCH /orders/{channel}/{id} — push a status update to the channel.
///
/// The channel stays the source of truth; the response acknowledges the
/// push instead of returning a locally patched copy of the order.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((channel, order_id)): Path<(String, String)>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<UpdateOrderResponse>, ApiError> {
    let channel = parse_channel(&channel)?;
    let status = parse_status(&req.status)?;

    let updated = state
        .orchestrator
        .push_order_status(channel, &order_id, status, req.tracking_number.as_deref())
        .await?;

    Ok(Json(UpdateOrderResponse {
        channel,
        order_id,
        status: status.to_string(),
        updated,
    }))
}

/// POST /orders/sync — force a fresh pull from the channels.
#[tracing::instrument(skip(state))]
pub async fn sync<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SyncOrdersParams>,
) -> Result<Json<OrderRefresh>, ApiError> {
    let subset = parse_channel_list(&params.channel)?;

    let refresh = state
        .orchestrator
        .refresh_orders(state.settings.max_orders_per_sync, subset.as_deref())
        .await;

    Ok(Json(refresh))
}
