//! Configuration management for the runtime core
//!
//! This module handles loading, validation, and management of all configuration.

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{FormulaError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Application configuration
    pub app: AppConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FormulaError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping
        let app: AppConfig = if content.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| FormulaError::Config(format!("Failed to parse config: {}", e)))?
        };

        let config = Self { app };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            app: AppConfig::default().with_env_overrides()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply `FORMULA_*` environment overrides to an already loaded configuration
    pub fn with_env_overrides(self) -> Result<Self> {
        let config = Self {
            app: self.app.with_env_overrides()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.app.server
    }

    /// Get bootstrap configuration
    pub fn bootstrap(&self) -> &BootstrapConfig {
        &self.app.bootstrap
    }

    /// Get monitoring configuration
    pub fn monitoring(&self) -> &MonitoringConfig {
        &self.app.monitoring
    }

    /// Get realtime hub configuration
    pub fn realtime(&self) -> &RealtimeConfig {
        &self.app.realtime
    }

    /// Get job queue configuration
    pub fn jobs(&self) -> &JobsConfig {
        &self.app.jobs
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.app.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.app
            .server
            .validate()
            .map_err(|e| FormulaError::Config(format!("Server config error: {}", e)))?;

        self.app
            .bootstrap
            .validate()
            .map_err(|e| FormulaError::Config(format!("Bootstrap config error: {}", e)))?;

        self.app
            .monitoring
            .validate()
            .map_err(|e| FormulaError::Config(format!("Monitoring config error: {}", e)))?;

        self.app
            .realtime
            .validate()
            .map_err(|e| FormulaError::Config(format!("Realtime config error: {}", e)))?;

        self.app
            .jobs
            .validate()
            .map_err(|e| FormulaError::Config(format!("Jobs config error: {}", e)))?;

        self.app
            .logging
            .validate()
            .map_err(|e| FormulaError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.app)?)
    }
}
