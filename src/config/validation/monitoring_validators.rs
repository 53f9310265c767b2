//! Monitoring configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating monitoring configuration");

        let intervals = [
            ("Collection", self.collection_interval_secs),
            ("Aggregation", self.aggregation_interval_secs),
            ("Retention", self.retention_interval_secs),
        ];
        for (name, secs) in intervals {
            if secs == 0 {
                return Err(format!("{} interval must be greater than 0", name));
            }
        }

        if self.retention_period_secs == 0 {
            return Err("Retention period must be greater than 0".to_string());
        }

        if self.cpu_sample_window_ms == 0 {
            return Err("CPU sample window must be greater than 0".to_string());
        }

        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(format!(
                "EMA alpha must be in (0, 1], got {}",
                self.ema_alpha
            ));
        }

        if self.history_capacity == 0 {
            return Err("History capacity must be greater than 0".to_string());
        }

        self.thresholds.validate()
    }
}

impl Validate for AlertThresholds {
    fn validate(&self) -> Result<(), String> {
        let values = [
            self.cpu_warning,
            self.cpu_critical,
            self.memory_warning,
            self.memory_critical,
            self.response_time_ms,
            self.error_rate_percent,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err("Alert thresholds must be finite and non-negative".to_string());
        }

        if self.cpu_warning > self.cpu_critical {
            return Err("CPU warning threshold cannot exceed the critical threshold".to_string());
        }

        if self.memory_warning > self.memory_critical {
            return Err(
                "Memory warning threshold cannot exceed the critical threshold".to_string(),
            );
        }

        Ok(())
    }
}
