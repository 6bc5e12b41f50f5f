//! Route handlers and shared application state.

pub mod channels;
pub mod health;
pub mod inventory;
pub mod metrics;
pub mod orders;

use std::sync::Arc;

use aggregator::OrderAggregator;
use ::channels::OrderStatus;
use common::{ChannelId, ParseChannelError};
use ledger::{InventoryLedger, InventoryStore};
use orchestrator::SyncOrchestrator;

use crate::config::Settings;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: InventoryStore> {
    pub ledger: Arc<InventoryLedger<S>>,
    pub aggregator: Arc<OrderAggregator>,
    pub orchestrator: Arc<SyncOrchestrator<S>>,
    pub settings: Settings,
}

/// Parses a channel name from a path or query segment.
pub(crate) fn parse_channel(raw: &str) -> Result<ChannelId, ApiError> {
    raw.parse()
        .map_err(|e: ParseChannelError| ApiError::BadRequest(e.to_string()))
}

/// Parses an order status from a path or query segment.
pub(crate) fn parse_status(raw: &str) -> Result<OrderStatus, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}
