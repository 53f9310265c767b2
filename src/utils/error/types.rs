//! Error types for the runtime core

use super::bootstrap::BootstrapError;
use thiserror::Error;

/// Result type alias for the runtime core
pub type Result<T> = std::result::Result<T, FormulaError>;

/// Main error type for the runtime core
#[derive(Error, Debug)]
pub enum FormulaError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Bootstrap errors
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// A service initializer reported a failure
    #[error("Service initialization failed: {0}")]
    ServiceInit(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Monitoring errors
    #[error("Monitoring error: {0}")]
    Monitoring(String),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Background queue errors
    #[error("Queue error: {0}")]
    Queue(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
