//! Runtime connection metadata per channel.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::ChannelId;
use serde::Serialize;
use tokio::sync::RwLock;

/// Outcome of the most recent sync touching a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    Success,
    Failure,
}

/// Sync bookkeeping for one channel.
///
/// Operational metadata, not business data: when the channel was last
/// touched, how that went, and how many orders have flowed through it.
/// Credentials stay with the adapter configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelConnection {
    pub channel: ChannelId,
    pub active: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_outcome: Option<SyncOutcome>,
    pub last_error: Option<String>,
    pub orders_synced: u64,
}

impl ChannelConnection {
    fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            active: true,
            last_sync_at: None,
            last_outcome: None,
            last_error: None,
            orders_synced: 0,
        }
    }
}

/// Shared registry of per-channel connection metadata.
#[derive(Clone)]
pub struct ConnectionRegistry {
    state: Arc<RwLock<BTreeMap<ChannelId, ChannelConnection>>>,
}

impl ConnectionRegistry {
    /// Creates a registry seeded with one active entry per channel.
    pub fn new(channels: impl IntoIterator<Item = ChannelId>) -> Self {
        let state = channels
            .into_iter()
            .map(|c| (c, ChannelConnection::new(c)))
            .collect();
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Records a successful sync that moved `orders` orders.
    pub async fn record_success(&self, channel: ChannelId, orders: u64) {
        let mut state = self.state.write().await;
        let entry = state
            .entry(channel)
            .or_insert_with(|| ChannelConnection::new(channel));
        entry.last_sync_at = Some(Utc::now());
        entry.last_outcome = Some(SyncOutcome::Success);
        entry.last_error = None;
        entry.orders_synced += orders;
    }

    /// Records a failed sync with its error text.
    pub async fn record_failure(&self, channel: ChannelId, error: impl Into<String>) {
        let mut state = self.state.write().await;
        let entry = state
            .entry(channel)
            .or_insert_with(|| ChannelConnection::new(channel));
        entry.last_sync_at = Some(Utc::now());
        entry.last_outcome = Some(SyncOutcome::Failure);
        entry.last_error = Some(error.into());
    }

    /// Loads one channel's connection metadata.
    pub async fn get(&self, channel: ChannelId) -> Option<ChannelConnection> {
        self.state.read().await.get(&channel).cloned()
    }

    /// Snapshot of all connections in canonical channel order.
    pub async fn snapshot(&self) -> Vec<ChannelConnection> {
        self.state.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_seeds_active_entries() {
        let registry = ConnectionRegistry::new(ChannelId::ALL);
        let all = registry.snapshot().await;

        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|c| c.active));
        assert!(all.iter().all(|c| c.last_sync_at.is_none()));
    }

    #[tokio::test]
    async fn success_accumulates_order_count_and_clears_error() {
        let registry = ConnectionRegistry::new([ChannelId::Shopify]);

        registry
            .record_failure(ChannelId::Shopify, "connection refused")
            .await;
        registry.record_success(ChannelId::Shopify, 3).await;
        registry.record_success(ChannelId::Shopify, 2).await;

        let conn = registry.get(ChannelId::Shopify).await.unwrap();
        assert_eq!(conn.orders_synced, 5);
        assert_eq!(conn.last_outcome, Some(SyncOutcome::Success));
        assert!(conn.last_error.is_none());
        assert!(conn.last_sync_at.is_some());
    }

    #[tokio::test]
    async fn failure_keeps_cumulative_count() {
        let registry = ConnectionRegistry::new([ChannelId::Ebay]);

        registry.record_success(ChannelId::Ebay, 4).await;
        registry.record_failure(ChannelId::Ebay, "timed out").await;

        let conn = registry.get(ChannelId::Ebay).await.unwrap();
        assert_eq!(conn.orders_synced, 4);
        assert_eq!(conn.last_outcome, Some(SyncOutcome::Failure));
        assert_eq!(conn.last_error.as_deref(), Some("timed out"));
    }
}
