//! Built-in alert rules

use super::types::{AlertCondition, AlertRule, AlertSeverity, ComparisonOperator, MetricKey};
use crate::config::AlertThresholds;

pub const CPU_HIGH: &str = "cpu_high";
pub const CPU_CRITICAL: &str = "cpu_critical";
pub const MEMORY_HIGH: &str = "memory_high";
pub const MEMORY_CRITICAL: &str = "memory_critical";
pub const RESPONSE_TIME_SLOW: &str = "response_time_slow";
pub const ERROR_RATE_HIGH: &str = "error_rate_high";

fn above(metric: MetricKey, threshold: f64) -> AlertCondition {
    AlertCondition::threshold(metric, ComparisonOperator::GreaterThan, threshold)
}

/// The six rules every monitor starts with
pub fn builtin_rules(thresholds: &AlertThresholds) -> Vec<AlertRule> {
    vec![
        AlertRule::new(
            CPU_HIGH,
            "High CPU usage",
            above(MetricKey::CpuPercent, thresholds.cpu_warning),
            AlertSeverity::Warning,
            "CPU usage is high",
        ),
        AlertRule::new(
            CPU_CRITICAL,
            "Critical CPU usage",
            above(MetricKey::CpuPercent, thresholds.cpu_critical),
            AlertSeverity::Critical,
            "CPU usage is critically high",
        ),
        AlertRule::new(
            MEMORY_HIGH,
            "High memory usage",
            above(MetricKey::MemoryPercent, thresholds.memory_warning),
            AlertSeverity::Warning,
            "Memory usage is high",
        ),
        AlertRule::new(
            MEMORY_CRITICAL,
            "Critical memory usage",
            above(MetricKey::MemoryPercent, thresholds.memory_critical),
            AlertSeverity::Critical,
            "Memory usage is critically high",
        ),
        AlertRule::new(
            RESPONSE_TIME_SLOW,
            "Slow response time",
            above(MetricKey::AvgResponseTimeMs, thresholds.response_time_ms),
            AlertSeverity::Warning,
            "Average response time is slow",
        ),
        AlertRule::new(
            ERROR_RATE_HIGH,
            "High error rate",
            above(MetricKey::ErrorRatePercent, thresholds.error_rate_percent),
            AlertSeverity::Critical,
            "Request error rate is high",
        ),
    ]
}
