//! Alert management system
//!
//! Rules are evaluated against metric snapshots; each rule has at most one
//! active alert, raised when its condition holds and cleared when it stops
//! holding. Critical alerts are fanned out to registered notifiers.

mod channels;
mod manager;
mod rules;
mod types;

pub use channels::{AlertNotifier, CallbackNotifier, Notification, PERFORMANCE_ALERT};
pub use manager::{AlertManager, DEFAULT_COOLDOWN};
pub use rules::{
    builtin_rules, CPU_CRITICAL, CPU_HIGH, ERROR_RATE_HIGH, MEMORY_CRITICAL, MEMORY_HIGH,
    RESPONSE_TIME_SLOW,
};
pub use types::{
    Alert, AlertCondition, AlertRule, AlertSeverity, AlertStats, ComparisonOperator,
    CustomCondition, MetricKey,
};
