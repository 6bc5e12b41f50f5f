//! Order aggregation across all configured channels.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use channels::{ChannelClient, ChannelError, Order, OrderStatus};
use common::{ChannelId, Sku};
use futures_util::future::join_all;
use serde::Serialize;

use crate::error::AggregatorError;

/// Default page size per channel, matching the read path's default.
pub const DEFAULT_LIMIT_PER_CHANNEL: usize = 50;

/// A channel that contributed nothing to an aggregation, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelFailure {
    pub channel: ChannelId,
    pub reason: String,
}

/// The merged result of one aggregation pass.
///
/// Partial results are a success: failed channels are listed out of band
/// rather than turned into an error.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedOrders {
    /// Orders sorted by timestamp descending, ties broken by
    /// `(channel, id)` ascending.
    pub orders: Vec<Order>,
    pub failures: Vec<ChannelFailure>,
}

impl AggregatedOrders {
    /// Number of orders contributed by one channel.
    pub fn count_for(&self, channel: ChannelId) -> usize {
        self.orders.iter().filter(|o| o.channel == channel).count()
    }
}

/// Per-channel connectivity and contribution statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub connected: bool,
    pub orders_count: usize,
}

/// Fans out to the configured channel adapters and merges their answers.
///
/// Every channel call is bounded by `call_timeout`; a timed-out channel is
/// treated exactly like a failed health check. The merge waits for all
/// branches before sorting, since the ordering needs the complete set.
/// Dropping an in-flight aggregation future cancels the outstanding
/// per-channel calls with it.
pub struct OrderAggregator {
    channels: BTreeMap<ChannelId, Arc<dyn ChannelClient>>,
    call_timeout: Duration,
}

impl OrderAggregator {
    /// Creates an aggregator over the given adapters.
    pub fn new(
        clients: impl IntoIterator<Item = Arc<dyn ChannelClient>>,
        call_timeout: Duration,
    ) -> Self {
        let channels = clients.into_iter().map(|c| (c.id(), c)).collect();
        Self {
            channels,
            call_timeout,
        }
    }

    /// The configured channel set, in canonical order.
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.channels.keys().copied().collect()
    }

    /// Returns the adapter for a channel, if configured.
    pub fn client(&self, channel: ChannelId) -> Option<Arc<dyn ChannelClient>> {
        self.channels.get(&channel).cloned()
    }

    /// Fetches and merges orders from the requested channels (default: all).
    ///
    /// Each channel contributes at most `limit_per_channel` orders. A
    /// failing or slow channel is omitted and recorded in `failures`; it
    /// never fails the aggregation.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_orders(
        &self,
        limit_per_channel: usize,
        channels: Option<&[ChannelId]>,
    ) -> AggregatedOrders {
        let start = std::time::Instant::now();
        let targets: BTreeSet<ChannelId> = match channels {
            Some(subset) => subset.iter().copied().collect(),
            None => self.channels.keys().copied().collect(),
        };

        let fetches = targets.into_iter().map(|channel| {
            let client = self.channels.get(&channel).cloned();
            async move {
                let result = match client {
                    None => Err("channel not configured".to_string()),
                    Some(client) => {
                        match tokio::time::timeout(
                            self.call_timeout,
                            client.fetch_orders(limit_per_channel, None),
                        )
                        .await
                        {
                            Err(_) => Err(format!(
                                "timed out after {}ms",
                                self.call_timeout.as_millis()
                            )),
                            Ok(Err(e)) => Err(e.to_string()),
                            Ok(Ok(orders)) => Ok(orders),
                        }
                    }
                };
                (channel, result)
            }
        });

        let mut orders = Vec::new();
        let mut failures = Vec::new();
        for (channel, result) in join_all(fetches).await {
            match result {
                Ok(batch) => {
                    metrics::counter!("orders_aggregated_total", "channel" => channel.as_str())
                        .increment(batch.len() as u64);
                    orders.extend(batch);
                }
                Err(reason) => {
                    tracing::warn!(%channel, %reason, "channel dropped from aggregation");
                    metrics::counter!("channel_fetch_failures_total", "channel" => channel.as_str())
                        .increment(1);
                    failures.push(ChannelFailure { channel, reason });
                }
            }
        }

        sort_orders(&mut orders);
        metrics::histogram!("aggregation_duration_seconds").record(start.elapsed().as_secs_f64());

        AggregatedOrders { orders, failures }
    }

    /// Fetches a single order from one channel.
    pub async fn get_order(
        &self,
        channel: ChannelId,
        order_id: &str,
    ) -> Result<Option<Order>, AggregatorError> {
        let client = self
            .client(channel)
            .ok_or(AggregatorError::UnknownChannel(channel))?;

        match tokio::time::timeout(self.call_timeout, client.fetch_order(order_id)).await {
            Err(_) => Err(AggregatorError::Channel(ChannelError::unavailable(
                channel,
                "fetch_order timed out",
            ))),
            Ok(result) => result.map_err(AggregatorError::Channel),
        }
    }

    /// Health and order counts per configured channel.
    ///
    /// The counts come from running the same aggregation as the read path,
    /// so they are consistent with what `get_all_orders` returns.
    #[tracing::instrument(skip(self))]
    pub async fn get_platform_stats(&self) -> BTreeMap<ChannelId, ChannelStats> {
        let health_checks = self.channels.iter().map(|(&channel, client)| {
            let client = Arc::clone(client);
            async move {
                let healthy = tokio::time::timeout(self.call_timeout, client.health_check())
                    .await
                    .unwrap_or(false);
                (channel, healthy)
            }
        });
        let health: BTreeMap<ChannelId, bool> = join_all(health_checks).await.into_iter().collect();

        let aggregated = self
            .get_all_orders(DEFAULT_LIMIT_PER_CHANNEL, None)
            .await;

        self.channels
            .keys()
            .map(|&channel| {
                (
                    channel,
                    ChannelStats {
                        connected: health.get(&channel).copied().unwrap_or(false),
                        orders_count: aggregated.count_for(channel),
                    },
                )
            })
            .collect()
    }

    /// Pushes a status update to one channel and returns its answer
    /// verbatim.
    #[tracing::instrument(skip(self))]
    pub async fn sync_order_status(
        &self,
        channel: ChannelId,
        order_id: &str,
        status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<bool, AggregatorError> {
        let client = self
            .client(channel)
            .ok_or(AggregatorError::UnknownChannel(channel))?;

        match tokio::time::timeout(
            self.call_timeout,
            client.update_status(order_id, status, tracking_number),
        )
        .await
        {
            Err(_) => Err(AggregatorError::Channel(ChannelError::unavailable(
                channel,
                "update_status timed out",
            ))),
            Ok(result) => result.map_err(AggregatorError::Channel),
        }
    }

    /// Pushes an absolute quantity to every configured channel.
    ///
    /// Pushes are independent; one channel's failure never prevents the
    /// attempts on the others. The full per-channel result map is returned
    /// so callers can detect partial failure.
    #[tracing::instrument(skip(self))]
    pub async fn sync_inventory_across_channels(
        &self,
        sku: &Sku,
        quantity: u32,
    ) -> BTreeMap<ChannelId, bool> {
        let pushes = self.channels.iter().map(|(&channel, client)| {
            let client = Arc::clone(client);
            let sku = sku.clone();
            async move {
                let ok = match tokio::time::timeout(
                    self.call_timeout,
                    client.sync_inventory(&sku, quantity),
                )
                .await
                {
                    Err(_) => {
                        tracing::warn!(%channel, %sku, "inventory sync timed out");
                        false
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(%channel, %sku, error = %e, "inventory sync failed");
                        false
                    }
                    Ok(Ok(ok)) => ok,
                };
                let outcome = if ok { "success" } else { "failure" };
                metrics::counter!("channel_sync_total", "channel" => channel.as_str(), "outcome" => outcome)
                    .increment(1);
                (channel, ok)
            }
        });

        join_all(pushes).await.into_iter().collect()
    }
}

/// Sorts newest first; ties broken by `(channel, id)` for determinism.
fn sort_orders(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.placed_at
            .cmp(&a.placed_at)
            .then_with(|| a.channel.cmp(&b.channel))
            .then_with(|| a.id.cmp(&b.id))
    });
}
