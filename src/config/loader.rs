//! Environment variable overrides
//!
//! Every override is optional; unset variables leave the loaded value alone.

use super::models::*;
use crate::utils::error::{FormulaError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

impl AppConfig {
    /// Apply `FORMULA_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, used by tests
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Applying environment overrides");

        if let Some(host) = lookup("FORMULA_HOST") {
            self.server.host = host;
        }
        override_parsed(&lookup, "FORMULA_PORT", &mut self.server.port)?;

        override_parsed(
            &lookup,
            "FORMULA_SERVICE_TIMEOUT_SECS",
            &mut self.bootstrap.service_timeout_secs,
        )?;
        override_parsed(
            &lookup,
            "FORMULA_OVERALL_TIMEOUT_SECS",
            &mut self.bootstrap.overall_timeout_secs,
        )?;
        override_parsed(
            &lookup,
            "FORMULA_SKIP_DEPENDENTS_OF_FAILED_OPTIONAL",
            &mut self.bootstrap.skip_dependents_of_failed_optional,
        )?;

        override_parsed(
            &lookup,
            "FORMULA_MONITORING_ENABLED",
            &mut self.monitoring.enabled,
        )?;
        override_parsed(
            &lookup,
            "FORMULA_COLLECTION_INTERVAL_SECS",
            &mut self.monitoring.collection_interval_secs,
        )?;
        override_parsed(
            &lookup,
            "FORMULA_ALERT_COOLDOWN_SECS",
            &mut self.monitoring.alert_cooldown_secs,
        )?;

        if let Some(level) = lookup("FORMULA_LOG_LEVEL") {
            self.logging.level = level;
        }
        override_parsed(&lookup, "FORMULA_LOG_JSON", &mut self.logging.json)?;

        Ok(self)
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| FormulaError::Config(format!("Invalid {}: {}", key, e)))?;
    }
    Ok(())
}
