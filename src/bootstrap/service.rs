//! The capability surface every registered service exposes

use super::types::ServiceHealthReport;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A process-wide service managed by the registry
///
/// Only `initialize` is required. Services without a shutdown hook or a
/// status probe inherit no-op defaults, and report operational once their
/// initializer has succeeded.
#[async_trait]
pub trait ManagedService: Send + Sync + 'static {
    /// Bring the service up. Called at most once per process.
    async fn initialize(&self) -> Result<()>;

    /// Release resources held by the service
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Report the current status of the service
    async fn health_check(&self) -> Result<ServiceHealthReport> {
        Ok(ServiceHealthReport::operational())
    }
}
