//! Type definitions for monitoring snapshots and reports

use super::alerts::Alert;
use crate::config::AlertThresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of a historical series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Host resource readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Process CPU load over the sample window; may exceed 100 on multi-core hosts
    pub cpu_percent: f64,
    /// Share of host memory in use
    pub memory_percent: f64,
    pub free_memory_bytes: u64,
    pub total_memory_bytes: u64,
    pub uptime_seconds: u64,
    /// One, five and fifteen minute load averages
    pub load_average: [f64; 3],
}

/// HTTP request metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub total_requests: u64,
    /// Exponential moving average
    pub avg_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub error_count: u64,
    pub error_rate_percent: f64,
}

/// Database query metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMetrics {
    pub query_count: u64,
    /// Exponential moving average
    pub avg_query_time_ms: f64,
    pub slow_query_count: u64,
}

/// Realtime transport gauges, replaced wholesale on every update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealtimeMetrics {
    pub active_connections: u64,
    pub messages_per_second: f64,
    pub avg_latency_ms: f64,
}

/// Point-in-time copy of every metric group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub timestamp: DateTime<Utc>,
    pub system: SystemMetrics,
    pub requests: RequestMetrics,
    pub database: DatabaseMetrics,
    pub realtime: RealtimeMetrics,
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            system: SystemMetrics::default(),
            requests: RequestMetrics::default(),
            database: DatabaseMetrics::default(),
            realtime: RealtimeMetrics::default(),
        }
    }
}

/// Historical series plus alert history and the thresholds in effect
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceTrends {
    pub cpu: Vec<TimePoint>,
    pub memory: Vec<TimePoint>,
    pub alerts: Vec<Alert>,
    pub thresholds: AlertThresholds,
}

/// Whether the monitor's loops are running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    Operational,
    Initializing,
}

/// Status the monitor reports to health checks
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringStatus {
    pub status: MonitorState,
    /// System samples recorded since start
    pub metrics_collected: u64,
    pub active_alerts: usize,
    pub total_alerts: u64,
    /// Number of background loops running
    pub monitoring_intervals: usize,
    pub uptime_seconds: u64,
}
