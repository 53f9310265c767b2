//! Collaborators the performance monitor reads from and writes to

use super::types::RealtimeMetrics;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Cache key of the latest aggregated snapshot
pub const SNAPSHOT_KEY: &str = "performance:metrics";
/// Cache key of the historical series
pub const HISTORY_KEY: &str = "performance:history";

/// Key/value store the aggregation loop persists snapshots to
#[async_trait]
pub trait SnapshotStore: Send + Sync + fmt::Debug {
    async fn put(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;
}

/// Provider of realtime transport gauges
pub trait RealtimeStatsSource: Send + Sync + fmt::Debug {
    fn realtime_stats(&self) -> RealtimeMetrics;
}
