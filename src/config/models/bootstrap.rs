//! Bootstrap configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Budget for a single service initializer, in seconds
    #[serde(default = "default_service_timeout")]
    pub service_timeout_secs: u64,
    /// Initializers slower than this are logged, in seconds
    #[serde(default = "default_slow_service_warning")]
    pub slow_service_warning_secs: u64,
    /// Budget for the whole initialization walk, in seconds
    #[serde(default = "default_overall_timeout")]
    pub overall_timeout_secs: u64,
    /// Budget for a single health probe, in seconds
    #[serde(default = "default_health_probe_timeout")]
    pub health_probe_timeout_secs: u64,
    /// Budget for a single service shutdown, in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
    /// When set, dependents of a failed optional service are not started
    #[serde(default)]
    pub skip_dependents_of_failed_optional: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            service_timeout_secs: default_service_timeout(),
            slow_service_warning_secs: default_slow_service_warning(),
            overall_timeout_secs: default_overall_timeout(),
            health_probe_timeout_secs: default_health_probe_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            skip_dependents_of_failed_optional: false,
        }
    }
}

impl BootstrapConfig {
    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service_timeout_secs)
    }

    pub fn slow_service_warning(&self) -> Duration {
        Duration::from_secs(self.slow_service_warning_secs)
    }

    pub fn overall_timeout(&self) -> Duration {
        Duration::from_secs(self.overall_timeout_secs)
    }

    pub fn health_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.health_probe_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_service_timeout() -> u64 {
    30
}

fn default_slow_service_warning() -> u64 {
    10
}

fn default_overall_timeout() -> u64 {
    60
}

fn default_health_probe_timeout() -> u64 {
    5
}

fn default_shutdown_timeout() -> u64 {
    10
}
