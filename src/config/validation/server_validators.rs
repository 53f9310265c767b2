//! Server, logging and service section validators

use super::trait_def::Validate;
use crate::config::models::*;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        // Plain levels are checked; full filter directives are left to the subscriber
        let level = self.level.to_lowercase();
        if !level.contains('=') && !level.contains(',') && !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!("Unknown log level '{}'", self.level));
        }
        Ok(())
    }
}

impl Validate for RealtimeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.channel_capacity == 0 {
            return Err("Realtime channel capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for JobsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("Job queue capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}
