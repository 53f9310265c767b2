//! Alert manager implementation

use super::channels::{AlertNotifier, Notification};
use super::types::{Alert, AlertRule, AlertSeverity, AlertStats, AlertStorage};
use crate::monitoring::metrics::BoundedPush;
use crate::monitoring::types::MetricSnapshot;
use crate::utils::error::{FormulaError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Upper bound on retained alert history, independent of age
const MAX_HISTORY: usize = 1000;

/// Default minimum age before an active alert may be raised again
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// Evaluates rules against metric snapshots and tracks alert state per rule
#[derive(Debug)]
pub struct AlertManager {
    /// Consolidated storage for all alert-related data
    storage: RwLock<AlertStorage>,
    notifiers: RwLock<Vec<Arc<dyn AlertNotifier>>>,
    cooldown: Duration,
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl AlertManager {
    /// Create an alert manager with the given re-trigger cool-down
    pub fn new(cooldown: Duration) -> Self {
        Self {
            storage: RwLock::new(AlertStorage::default()),
            notifiers: RwLock::new(Vec::new()),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Add an alert rule, replacing any rule with the same id
    pub fn add_rule(&self, rule: AlertRule) {
        debug!("Adding alert rule: {}", rule.id);

        let mut storage = self.storage.write();
        match storage.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => storage.rules.push(rule),
        }
    }

    pub fn add_rules(&self, rules: impl IntoIterator<Item = AlertRule>) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    /// Remove an alert rule and forget its active alert
    pub fn remove_rule(&self, rule_id: &str) -> bool {
        info!("Removing alert rule: {}", rule_id);

        let mut storage = self.storage.write();
        let before = storage.rules.len();
        storage.rules.retain(|r| r.id != rule_id);
        storage.active.remove(rule_id);
        storage.rules.len() != before
    }

    pub fn rules(&self) -> Vec<AlertRule> {
        self.storage.read().rules.clone()
    }

    /// Register a destination for critical alerts
    pub fn add_notifier(&self, notifier: Arc<dyn AlertNotifier>) {
        debug!("Adding alert notifier: {}", notifier.name());
        self.notifiers.write().push(notifier);
    }

    pub fn notifier_count(&self) -> usize {
        self.notifiers.read().len()
    }

    /// Evaluate every enabled rule, returning the alerts raised by this pass
    pub fn evaluate(&self, snapshot: &MetricSnapshot) -> Vec<Alert> {
        self.evaluate_at(snapshot, Utc::now())
    }

    /// Evaluate every enabled rule as of `now`
    ///
    /// A rule whose condition holds raises a new alert unless its active alert
    /// is younger than the cool-down; the superseded alert is marked cleared.
    /// A rule whose condition no longer holds clears its active alert.
    pub fn evaluate_at(&self, snapshot: &MetricSnapshot, now: DateTime<Utc>) -> Vec<Alert> {
        let mut raised = Vec::new();
        let mut guard = self.storage.write();
        let AlertStorage {
            rules,
            active,
            history,
            stats,
        } = &mut *guard;

        for rule in rules.iter().filter(|r| r.enabled) {
            if rule.condition.evaluate(snapshot) {
                let cooling_down = active
                    .get(&rule.id)
                    .is_some_and(|alert| self.within_cooldown(alert, now));
                if cooling_down {
                    continue;
                }

                let alert = Alert::raise(rule, snapshot, now);
                match alert.severity {
                    AlertSeverity::Critical => error!("Performance alert: {}", alert.message),
                    AlertSeverity::Warning => warn!("Performance alert: {}", alert.message),
                }

                stats.total_alerts += 1;
                *stats
                    .alerts_by_severity
                    .entry(alert.severity.to_string())
                    .or_insert(0) += 1;
                stats.last_alert = Some(now);

                // A re-raise supersedes the previous alert for this rule
                if let Some(previous) = active.insert(rule.id.clone(), alert.clone()) {
                    if let Some(entry) = history.iter_mut().rev().find(|a| a.id == previous.id) {
                        entry.mark_cleared(now);
                    }
                }
                history.push_bounded(alert.clone(), MAX_HISTORY);
                raised.push(alert);
            } else if let Some(mut alert) = active.remove(&rule.id) {
                alert.mark_cleared(now);
                if let Some(entry) = history.iter_mut().rev().find(|a| a.id == alert.id) {
                    entry.mark_cleared(now);
                }
                stats.cleared_alerts += 1;
                info!("Alert cleared: {}", alert.name);
            }
        }

        raised
    }

    fn within_cooldown(&self, alert: &Alert, now: DateTime<Utc>) -> bool {
        match now.signed_duration_since(alert.triggered_at).to_std() {
            Ok(age) => age < self.cooldown,
            // Triggered in the future relative to `now`
            Err(_) => true,
        }
    }

    /// Fan critical alerts out to every notifier that accepts them
    ///
    /// Best effort: delivery failures are logged and counted, never returned,
    /// and never change alert state. Returns the number of successful deliveries.
    pub async fn dispatch(&self, alerts: &[Alert]) -> usize {
        let critical: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .collect();
        if critical.is_empty() {
            return 0;
        }

        let notifiers = self.notifiers.read().clone();
        let mut delivered = 0;

        for alert in critical {
            let notification = Notification::from_alert(alert);
            for notifier in notifiers.iter().filter(|n| n.supports_severity(alert.severity)) {
                match notifier.send(&notification).await {
                    Ok(()) => {
                        debug!("Alert {} sent via {}", alert.id, notifier.name());
                        delivered += 1;
                    }
                    Err(e) => {
                        warn!("Failed to send alert via {}: {}", notifier.name(), e);
                        self.storage.write().stats.failed_notifications += 1;
                    }
                }
            }
        }

        delivered
    }

    /// Mark an alert as acknowledged
    pub fn acknowledge(&self, alert_id: &str) -> Result<()> {
        let found = self
            .storage
            .write()
            .update_alert(alert_id, |alert| alert.acknowledged = true);

        if found {
            info!("Alert {} acknowledged", alert_id);
            Ok(())
        } else {
            Err(FormulaError::not_found(format!("alert {}", alert_id)))
        }
    }

    /// Uncleared alerts, oldest first
    pub fn active_alerts(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.storage.read().active.values().cloned().collect();
        alerts.sort_by_key(|a| a.triggered_at);
        alerts
    }

    pub fn active_count(&self) -> usize {
        self.storage.read().active.len()
    }

    /// Alert history, newest first
    pub fn history(&self, limit: Option<usize>) -> Vec<Alert> {
        let storage = self.storage.read();
        let limit = limit.unwrap_or(usize::MAX);

        storage.history.iter().rev().take(limit).cloned().collect()
    }

    /// Get alert statistics
    pub fn stats(&self) -> AlertStats {
        self.storage.read().stats.clone()
    }

    /// Drop history entries triggered before `cutoff`, returning how many were removed
    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut storage = self.storage.write();
        let before = storage.history.len();
        storage.history.retain(|a| a.triggered_at >= cutoff);

        let removed = before - storage.history.len();
        if removed > 0 {
            debug!("Purged {} alerts older than {}", removed, cutoff);
        }
        removed
    }

    /// Forget all alerts and statistics; rules and notifiers are kept
    pub fn clear(&self) {
        let mut storage = self.storage.write();
        storage.active.clear();
        storage.history.clear();
        storage.stats = AlertStats::default();
    }
}
