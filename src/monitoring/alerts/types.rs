//! Alert types and data structures

use crate::monitoring::types::MetricSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Alert severity levels, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Comparison operators for alert rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => value > threshold,
            ComparisonOperator::LessThan => value < threshold,
            ComparisonOperator::GreaterThanOrEqual => value >= threshold,
            ComparisonOperator::LessThanOrEqual => value <= threshold,
            ComparisonOperator::Equal => (value - threshold).abs() < f64::EPSILON,
            ComparisonOperator::NotEqual => (value - threshold).abs() >= f64::EPSILON,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

/// A metric that threshold rules can watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    CpuPercent,
    MemoryPercent,
    AvgResponseTimeMs,
    ErrorRatePercent,
    AvgQueryTimeMs,
    ActiveConnections,
}

impl MetricKey {
    /// Read the metric from a snapshot
    pub fn read(self, snapshot: &MetricSnapshot) -> f64 {
        match self {
            MetricKey::CpuPercent => snapshot.system.cpu_percent,
            MetricKey::MemoryPercent => snapshot.system.memory_percent,
            MetricKey::AvgResponseTimeMs => snapshot.requests.avg_response_time_ms,
            MetricKey::ErrorRatePercent => snapshot.requests.error_rate_percent,
            MetricKey::AvgQueryTimeMs => snapshot.database.avg_query_time_ms,
            MetricKey::ActiveConnections => snapshot.realtime.active_connections as f64,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKey::CpuPercent => "cpu_percent",
            MetricKey::MemoryPercent => "memory_percent",
            MetricKey::AvgResponseTimeMs => "avg_response_time_ms",
            MetricKey::ErrorRatePercent => "error_rate_percent",
            MetricKey::AvgQueryTimeMs => "avg_query_time_ms",
            MetricKey::ActiveConnections => "active_connections",
        };
        f.write_str(name)
    }
}

/// Predicate over a metric snapshot
pub type CustomCondition = Arc<dyn Fn(&MetricSnapshot) -> bool + Send + Sync>;

/// When a rule fires
#[derive(Clone)]
pub enum AlertCondition {
    /// Compare one metric against a fixed threshold
    Threshold {
        metric: MetricKey,
        operator: ComparisonOperator,
        threshold: f64,
    },
    /// Arbitrary predicate
    Custom(CustomCondition),
}

impl AlertCondition {
    pub fn threshold(metric: MetricKey, operator: ComparisonOperator, threshold: f64) -> Self {
        AlertCondition::Threshold {
            metric,
            operator,
            threshold,
        }
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&MetricSnapshot) -> bool + Send + Sync + 'static,
    {
        AlertCondition::Custom(Arc::new(predicate))
    }

    pub fn evaluate(&self, snapshot: &MetricSnapshot) -> bool {
        match self {
            AlertCondition::Threshold {
                metric,
                operator,
                threshold,
            } => operator.compare(metric.read(snapshot), *threshold),
            AlertCondition::Custom(predicate) => predicate(snapshot),
        }
    }

    /// Human-readable reading for alert messages, when the condition has one
    pub(super) fn describe(&self, snapshot: &MetricSnapshot) -> Option<String> {
        match self {
            AlertCondition::Threshold {
                metric,
                operator,
                threshold,
            } => Some(format!(
                "{} = {:.1} ({} {})",
                metric,
                metric.read(snapshot),
                operator.symbol(),
                threshold
            )),
            AlertCondition::Custom(_) => None,
        }
    }
}

impl fmt::Debug for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertCondition::Threshold {
                metric,
                operator,
                threshold,
            } => f
                .debug_struct("Threshold")
                .field("metric", metric)
                .field("operator", operator)
                .field("threshold", threshold)
                .finish(),
            AlertCondition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Alert rule for automated alerting
#[derive(Debug, Clone)]
pub struct AlertRule {
    /// Rule ID, also the key of the rule's alert state
    pub id: String,
    /// Rule name
    pub name: String,
    pub condition: AlertCondition,
    pub severity: AlertSeverity,
    /// Message attached to raised alerts
    pub message: String,
    /// Disabled rules are skipped by evaluation
    pub enabled: bool,
}

impl AlertRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        condition: AlertCondition,
        severity: AlertSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            condition,
            severity,
            message: message.into(),
            enabled: true,
        }
    }
}

/// A raised alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub rule_id: String,
    pub name: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub metrics_at_trigger: MetricSnapshot,
    pub triggered_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub cleared: bool,
    pub cleared_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub(super) fn raise(rule: &AlertRule, snapshot: &MetricSnapshot, now: DateTime<Utc>) -> Self {
        let message = match rule.condition.describe(snapshot) {
            Some(reading) => format!("{}: {}", rule.message, reading),
            None => rule.message.clone(),
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            severity: rule.severity,
            message,
            metrics_at_trigger: snapshot.clone(),
            triggered_at: now,
            acknowledged: false,
            cleared: false,
            cleared_at: None,
        }
    }

    pub(super) fn mark_cleared(&mut self, at: DateTime<Utc>) {
        self.cleared = true;
        self.cleared_at = Some(at);
    }
}

/// Alert statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct AlertStats {
    /// Total alerts raised
    pub total_alerts: u64,
    /// Alerts by severity
    pub alerts_by_severity: HashMap<String, u64>,
    pub cleared_alerts: u64,
    /// Failed notifications
    pub failed_notifications: u64,
    /// Last alert timestamp
    pub last_alert: Option<DateTime<Utc>>,
}

/// Consolidated alert storage - single lock for related data
#[derive(Debug, Default)]
pub(super) struct AlertStorage {
    /// Rules in insertion order
    pub rules: Vec<AlertRule>,
    /// Uncleared alert per rule id
    pub active: HashMap<String, Alert>,
    /// Every raised alert, oldest first
    pub history: VecDeque<Alert>,
    pub stats: AlertStats,
}

impl AlertStorage {
    /// Apply `update` to the alert with `id` in both the active set and history
    pub fn update_alert<F>(&mut self, id: &str, update: F) -> bool
    where
        F: Fn(&mut Alert),
    {
        let mut found = false;
        if let Some(alert) = self.active.values_mut().find(|a| a.id == id) {
            update(alert);
            found = true;
        }
        if let Some(alert) = self.history.iter_mut().rev().find(|a| a.id == id) {
            update(alert);
            found = true;
        }
        found
    }
}
