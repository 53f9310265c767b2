//! Monitoring configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Performance monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Register the performance monitor at startup
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// System sampling and alert evaluation period, in seconds
    #[serde(default = "default_collection_interval")]
    pub collection_interval_secs: u64,
    /// Snapshot aggregation and cache write period, in seconds
    #[serde(default = "default_aggregation_interval")]
    pub aggregation_interval_secs: u64,
    /// Retention cleanup period, in seconds
    #[serde(default = "default_retention_interval")]
    pub retention_interval_secs: u64,
    /// Age after which history points and alerts are purged, in seconds
    #[serde(default = "default_retention_period")]
    pub retention_period_secs: u64,
    /// Window over which process CPU time is measured, in milliseconds
    #[serde(default = "default_cpu_sample_window")]
    pub cpu_sample_window_ms: u64,
    /// Smoothing factor of the moving averages
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,
    /// Points kept per historical series
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Minimum age before an active alert may be raised again, in seconds
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown_secs: u64,
    /// Lifetime of the cached metrics snapshot, in seconds
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_secs: u64,
    /// Lifetime of the cached historical series, in seconds
    #[serde(default = "default_history_ttl")]
    pub history_ttl_secs: u64,
    /// Alert thresholds
    #[serde(default)]
    pub thresholds: AlertThresholds,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collection_interval_secs: default_collection_interval(),
            aggregation_interval_secs: default_aggregation_interval(),
            retention_interval_secs: default_retention_interval(),
            retention_period_secs: default_retention_period(),
            cpu_sample_window_ms: default_cpu_sample_window(),
            ema_alpha: default_ema_alpha(),
            history_capacity: default_history_capacity(),
            alert_cooldown_secs: default_alert_cooldown(),
            snapshot_ttl_secs: default_snapshot_ttl(),
            history_ttl_secs: default_history_ttl(),
            thresholds: AlertThresholds::default(),
        }
    }
}

impl MonitoringConfig {
    pub fn collection_interval(&self) -> Duration {
        Duration::from_secs(self.collection_interval_secs)
    }

    pub fn aggregation_interval(&self) -> Duration {
        Duration::from_secs(self.aggregation_interval_secs)
    }

    pub fn retention_interval(&self) -> Duration {
        Duration::from_secs(self.retention_interval_secs)
    }

    pub fn retention_period(&self) -> Duration {
        Duration::from_secs(self.retention_period_secs)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_window_ms)
    }

    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_secs)
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_secs)
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }
}

/// Thresholds used by the built-in alert rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// CPU percentage raising a warning
    #[serde(default = "default_cpu_warning")]
    pub cpu_warning: f64,
    /// CPU percentage raising a critical alert
    #[serde(default = "default_cpu_critical")]
    pub cpu_critical: f64,
    /// Memory percentage raising a warning
    #[serde(default = "default_memory_warning")]
    pub memory_warning: f64,
    /// Memory percentage raising a critical alert
    #[serde(default = "default_memory_critical")]
    pub memory_critical: f64,
    /// Average response time in milliseconds
    #[serde(default = "default_response_time")]
    pub response_time_ms: f64,
    /// Error rate in percent
    #[serde(default = "default_error_rate")]
    pub error_rate_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_warning: default_cpu_warning(),
            cpu_critical: default_cpu_critical(),
            memory_warning: default_memory_warning(),
            memory_critical: default_memory_critical(),
            response_time_ms: default_response_time(),
            error_rate_percent: default_error_rate(),
        }
    }
}

fn default_collection_interval() -> u64 {
    30
}

fn default_aggregation_interval() -> u64 {
    60
}

fn default_retention_interval() -> u64 {
    3600
}

fn default_retention_period() -> u64 {
    24 * 3600
}

fn default_cpu_sample_window() -> u64 {
    100
}

fn default_ema_alpha() -> f64 {
    0.1
}

fn default_history_capacity() -> usize {
    100
}

fn default_alert_cooldown() -> u64 {
    300
}

fn default_snapshot_ttl() -> u64 {
    300
}

fn default_history_ttl() -> u64 {
    3600
}

fn default_cpu_warning() -> f64 {
    70.0
}

fn default_cpu_critical() -> f64 {
    85.0
}

fn default_memory_warning() -> f64 {
    75.0
}

fn default_memory_critical() -> f64 {
    90.0
}

fn default_response_time() -> f64 {
    200.0
}

fn default_error_rate() -> f64 {
    5.0
}
