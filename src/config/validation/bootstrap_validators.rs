//! Bootstrap configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for BootstrapConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating bootstrap configuration");

        if self.service_timeout_secs == 0 {
            return Err("Service timeout must be greater than 0".to_string());
        }

        if self.overall_timeout_secs == 0 {
            return Err("Overall bootstrap timeout must be greater than 0".to_string());
        }

        if self.slow_service_warning_secs >= self.service_timeout_secs {
            return Err(format!(
                "Slow service warning ({}s) must be below the service timeout ({}s)",
                self.slow_service_warning_secs, self.service_timeout_secs
            ));
        }

        if self.overall_timeout_secs < self.service_timeout_secs {
            return Err(format!(
                "Overall bootstrap timeout ({}s) cannot be shorter than the service timeout ({}s)",
                self.overall_timeout_secs, self.service_timeout_secs
            ));
        }

        if self.health_probe_timeout_secs == 0 {
            return Err("Health probe timeout must be greater than 0".to_string());
        }

        if self.shutdown_timeout_secs == 0 {
            return Err("Shutdown timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
