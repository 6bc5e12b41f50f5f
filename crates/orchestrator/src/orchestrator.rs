//! Coordination of ledger mutations with outward channel propagation.

use std::collections::BTreeMap;
use std::sync::Arc;

use aggregator::{AggregatorError, ChannelFailure, OrderAggregator};
use channels::OrderStatus;
use chrono::{DateTime, Utc};
use common::{ChannelId, Sku};
use ledger::{ChangeContext, ChangeType, InventoryLedger, InventoryStore, LedgerError, Product};
use serde::Serialize;

use crate::connection::ConnectionRegistry;
use crate::error::{Result, SyncError};

/// Outcome of an inventory push: the settled local record plus each
/// channel's answer.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryPush {
    pub product: Product,
    pub channel_results: BTreeMap<ChannelId, bool>,
}

/// Outcome of a forced order refresh across channels.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRefresh {
    pub orders_synced: usize,
    pub channels_synced: Vec<ChannelId>,
    pub failures: Vec<ChannelFailure>,
    pub completed_at: DateTime<Utc>,
}

/// Drives the "mutate ledger, then propagate" sequence.
///
/// The ledger write always completes (and is durable) before the first
/// channel push starts; a crash mid-propagation leaves local state correct,
/// with only the channel side needing later reconciliation. No ledger lock
/// is ever held across a channel call.
pub struct SyncOrchestrator<S: InventoryStore> {
    ledger: Arc<InventoryLedger<S>>,
    aggregator: Arc<OrderAggregator>,
    connections: ConnectionRegistry,
}

impl<S: InventoryStore> SyncOrchestrator<S> {
    /// Creates an orchestrator over the given ledger and aggregator.
    pub fn new(ledger: Arc<InventoryLedger<S>>, aggregator: Arc<OrderAggregator>) -> Self {
        let connections = ConnectionRegistry::new(aggregator.channel_ids());
        Self {
            ledger,
            aggregator,
            connections,
        }
    }

    /// The per-channel connection metadata registry.
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Sets a SKU's quantity to an absolute target in the ledger, then
    /// optionally broadcasts that quantity to every channel.
    #[tracing::instrument(skip(self))]
    pub async fn push_inventory(
        &self,
        sku: &Sku,
        quantity: u32,
        sync_channels: bool,
    ) -> Result<InventoryPush> {
        let product = self
            .ledger
            .set_quantity(
                sku,
                quantity,
                ChangeType::Adjustment,
                ChangeContext::with_reason("manual update via API"),
            )
            .await?;

        let channel_results = if sync_channels {
            self.broadcast(sku, quantity).await
        } else {
            BTreeMap::new()
        };

        Ok(InventoryPush {
            product,
            channel_results,
        })
    }

    /// Broadcasts a SKU's quantity to every channel without touching the
    /// ledger. The SKU must exist.
    #[tracing::instrument(skip(self))]
    pub async fn broadcast_inventory(&self, sku: &Sku, quantity: u32) -> Result<InventoryPush> {
        let product = self
            .ledger
            .product(sku)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(sku.clone()))?;

        let channel_results = self.broadcast(sku, quantity).await;

        Ok(InventoryPush {
            product,
            channel_results,
        })
    }

    /// Pushes a fulfillment status update to one channel.
    #[tracing::instrument(skip(self))]
    pub async fn push_order_status(
        &self,
        channel: ChannelId,
        order_id: &str,
        status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<bool> {
        match self
            .aggregator
            .sync_order_status(channel, order_id, status, tracking_number)
            .await
        {
            Ok(true) => {
                self.connections.record_success(channel, 1).await;
                Ok(true)
            }
            Ok(false) => {
                self.connections
                    .record_failure(channel, "channel refused status update")
                    .await;
                Ok(false)
            }
            Err(AggregatorError::Channel(e)) => {
                self.connections.record_failure(channel, e.to_string()).await;
                Err(SyncError::Aggregator(AggregatorError::Channel(e)))
            }
            // An unknown channel has no registry entry to update.
            Err(e) => Err(e.into()),
        }
    }

    /// Re-runs the aggregation to pull fresh orders from the channels,
    /// recording per-channel sync metadata.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_orders(
        &self,
        limit_per_channel: usize,
        channels: Option<&[ChannelId]>,
    ) -> OrderRefresh {
        let targets: Vec<ChannelId> = match channels {
            Some(subset) => subset.to_vec(),
            None => self.aggregator.channel_ids(),
        };

        metrics::counter!("order_refreshes_total").increment(1);
        let aggregated = self.aggregator.get_all_orders(limit_per_channel, channels).await;

        let mut channels_synced = Vec::new();
        for channel in targets {
            if let Some(failure) = aggregated.failures.iter().find(|f| f.channel == channel) {
                self.connections
                    .record_failure(channel, failure.reason.clone())
                    .await;
            } else {
                let count = aggregated.count_for(channel);
                self.connections.record_success(channel, count as u64).await;
                channels_synced.push(channel);
            }
        }
        channels_synced.sort();

        OrderRefresh {
            orders_synced: aggregated.orders.len(),
            channels_synced,
            failures: aggregated.failures,
            completed_at: Utc::now(),
        }
    }

    async fn broadcast(&self, sku: &Sku, quantity: u32) -> BTreeMap<ChannelId, bool> {
        let results = self
            .aggregator
            .sync_inventory_across_channels(sku, quantity)
            .await;

        for (&channel, &ok) in &results {
            if ok {
                self.connections.record_success(channel, 0).await;
            } else {
                self.connections
                    .record_failure(channel, "inventory sync refused or unreachable")
                    .await;
            }
        }

        results
    }
}
