//! Performance monitoring
//!
//! Metrics are recorded synchronously by callers and sampled periodically by
//! the [`PerformanceMonitor`], which evaluates alert rules on every
//! collection tick and persists snapshots through a [`SnapshotStore`].

pub mod alerts;
pub mod metrics;
mod service;
mod sources;
pub mod types;

pub use service::{PerformanceMonitor, PerformanceMonitorBuilder};
pub use sources::{HISTORY_KEY, RealtimeStatsSource, SNAPSHOT_KEY, SnapshotStore};
pub use types::{
    DatabaseMetrics, MetricSnapshot, MonitorState, MonitoringStatus, PerformanceTrends,
    RealtimeMetrics, RequestMetrics, SystemMetrics, TimePoint,
};
