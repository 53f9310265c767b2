//! Application state shared across HTTP handlers

use crate::bootstrap::ServiceRegistry;
use crate::monitoring::PerformanceMonitor;
use crate::utils::error::{FormulaError, Result};
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every actix worker; all fields are `Arc`s.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry owning every bootstrapped service
    pub registry: Arc<ServiceRegistry>,
    /// Performance monitor, absent when monitoring is disabled
    pub monitor: Option<Arc<PerformanceMonitor>>,
}

impl AppState {
    pub fn new(registry: Arc<ServiceRegistry>, monitor: Option<Arc<PerformanceMonitor>>) -> Self {
        Self { registry, monitor }
    }

    pub fn monitor(&self) -> Result<&PerformanceMonitor> {
        self.monitor
            .as_deref()
            .ok_or_else(|| FormulaError::not_found("performance monitoring is disabled"))
    }
}
