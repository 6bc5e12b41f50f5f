//! Channel status and health endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use common::ChannelId;
use ledger::InventoryStore;
use orchestrator::SyncOutcome;
use serde::Serialize;

use super::{parse_channel, AppState};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ChannelStatusResponse {
    pub channel: ChannelId,
    pub name: &'static str,
    pub connected: bool,
    pub orders_count: usize,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_outcome: Option<SyncOutcome>,
    pub last_error: Option<String>,
    pub orders_synced: u64,
}

#[derive(Serialize)]
pub struct ChannelListResponse {
    pub channels: Vec<ChannelStatusResponse>,
    pub total_orders: usize,
}

#[derive(Serialize)]
pub struct ChannelHealthResponse {
    pub channel: ChannelId,
    pub healthy: bool,
    pub simulated: bool,
}

/// GET /channels — connectivity, order counts, and sync metadata per
/// channel.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ChannelListResponse>, ApiError> {
    let stats = state.aggregator.get_platform_stats().await;

    let mut channels = Vec::with_capacity(stats.len());
    let mut total_orders = 0;
    for (channel, stat) in stats {
        let connection = state.orchestrator.connections().get(channel).await;
        total_orders += stat.orders_count;
        channels.push(ChannelStatusResponse {
            channel,
            name: channel.display_name(),
            connected: stat.connected,
            orders_count: stat.orders_count,
            last_sync_at: connection.as_ref().and_then(|c| c.last_sync_at),
            last_outcome: connection.as_ref().and_then(|c| c.last_outcome),
            last_error: connection.as_ref().and_then(|c| c.last_error.clone()),
            orders_synced: connection.map(|c| c.orders_synced).unwrap_or(0),
        });
    }

    Ok(Json(ChannelListResponse {
        channels,
        total_orders,
    }))
}

/// GET /channels/{channel}/health — one channel's liveness probe.
#[tracing::instrument(skip(state))]
pub async fn health<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(channel): Path<String>,
) -> Result<Json<ChannelHealthResponse>, ApiError> {
    let channel = parse_channel(&channel)?;
    let client = state
        .aggregator
        .client(channel)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown channel: {channel}")))?;

    Ok(Json(ChannelHealthResponse {
        channel,
        healthy: client.health_check().await,
        simulated: client.is_simulated(),
    }))
}
