//! Notification channels for critical alerts

use super::types::{Alert, AlertSeverity};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag carried by alert notifications
pub const PERFORMANCE_ALERT: &str = "performance_alert";

/// Payload delivered to notifiers and realtime subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub severity: Option<AlertSeverity>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Notification {
    pub fn new(kind: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            severity: None,
            timestamp: Utc::now(),
            data: serde_json::Value::Null,
        }
    }

    /// Notification announcing a raised alert
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: PERFORMANCE_ALERT.to_string(),
            title: alert.name.clone(),
            message: alert.message.clone(),
            severity: Some(alert.severity),
            timestamp: alert.triggered_at,
            data: serde_json::json!({
                "alert_id": alert.id,
                "rule_id": alert.rule_id,
                "metrics": alert.metrics_at_trigger,
            }),
        }
    }
}

/// Destination for critical-alert notifications
#[async_trait::async_trait]
pub trait AlertNotifier: Send + Sync + fmt::Debug {
    /// Deliver a notification
    async fn send(&self, notification: &Notification) -> Result<()>;

    /// Get channel name
    fn name(&self) -> &str;

    /// Check if channel supports severity level
    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= AlertSeverity::Critical
    }
}

type Callback = Box<dyn Fn(&Notification) -> Result<()> + Send + Sync>;

/// Notifier backed by a plain callable
pub struct CallbackNotifier {
    name: String,
    min_severity: AlertSeverity,
    callback: Callback,
}

impl CallbackNotifier {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Notification) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            min_severity: AlertSeverity::Critical,
            callback: Box::new(callback),
        }
    }

    pub fn with_min_severity(mut self, severity: AlertSeverity) -> Self {
        self.min_severity = severity;
        self
    }
}

impl fmt::Debug for CallbackNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackNotifier")
            .field("name", &self.name)
            .field("min_severity", &self.min_severity)
            .finish()
    }
}

#[async_trait::async_trait]
impl AlertNotifier for CallbackNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        (self.callback)(notification)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}
