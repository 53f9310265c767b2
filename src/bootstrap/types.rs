//! Bootstrap types and data structures

use super::service::ManagedService;
use crate::utils::error::BootstrapError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Whether a failed initializer aborts the whole bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    /// Failure or timeout is fatal to process startup
    Critical,
    /// Failure or timeout is recorded and the walk continues
    Optional,
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::Critical => write!(f, "critical"),
            Criticality::Optional => write!(f, "optional"),
        }
    }
}

/// Status of a single service as seen by a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Operational,
    Error,
}

/// Aggregate status of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// What a service reports about itself when probed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealthReport {
    pub status: ServiceStatus,
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ServiceHealthReport {
    pub fn operational() -> Self {
        Self {
            status: ServiceStatus::Operational,
            detail: None,
            metadata: HashMap::new(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Error,
            detail: Some(detail.into()),
            metadata: HashMap::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Per-service entry of a health snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: ServiceStatus,
    pub response_time_ms: u64,
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    pub last_check: DateTime<Utc>,
}

impl ServiceHealth {
    pub(super) fn from_report(report: ServiceHealthReport, response_time_ms: u64) -> Self {
        Self {
            status: report.status,
            response_time_ms,
            detail: report.detail,
            metadata: report.metadata,
            last_check: Utc::now(),
        }
    }

    pub(super) fn error(detail: impl Into<String>, response_time_ms: u64) -> Self {
        Self::from_report(ServiceHealthReport::error(detail), response_time_ms)
    }

    pub fn is_operational(&self) -> bool {
        self.status == ServiceStatus::Operational
    }
}

/// Point-in-time health of every registered service
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: HealthState,
    pub total_services: usize,
    pub healthy_services: usize,
    pub unhealthy_services: usize,
    pub response_time_ms: u64,
    pub last_check: DateTime<Utc>,
    pub services: BTreeMap<String, ServiceHealth>,
}

impl HealthSnapshot {
    pub(super) fn aggregate(services: BTreeMap<String, ServiceHealth>, response_time_ms: u64) -> Self {
        let total_services = services.len();
        let healthy_services = services.values().filter(|s| s.is_operational()).count();
        let status = if healthy_services == total_services {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        };

        Self {
            status,
            total_services,
            healthy_services,
            unhealthy_services: total_services - healthy_services,
            response_time_ms,
            last_check: Utc::now(),
            services,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// A failed initialization attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceFailure {
    pub service: String,
    pub criticality: Criticality,
    pub reason: String,
    pub elapsed_ms: u64,
    pub failed_at: DateTime<Utc>,
}

/// Outcome of the initialization walk
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub initialized: bool,
    /// Resolved initialization order
    pub order: Vec<String>,
    /// Services attempted so far, in the order they were attempted
    pub processed: Vec<String>,
    pub failed: Vec<ServiceFailure>,
    /// Services that succeeded but took longer than the slow-service threshold
    pub slow: Vec<String>,
    pub duration_ms: Option<u64>,
}

/// Outcome of a shutdown pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShutdownReport {
    /// Services whose shutdown hook ran, in the order it ran
    pub stopped: Vec<String>,
    /// Shutdown hooks that failed, panicked or timed out
    pub failures: BTreeMap<String, String>,
}

/// One registered service
#[derive(Clone)]
pub(super) struct ServiceDescriptor {
    pub name: String,
    pub service: Arc<dyn ManagedService>,
    /// Same allocation as `service`, kept for typed lookups
    pub instance: Arc<dyn Any + Send + Sync>,
    pub type_name: &'static str,
    pub dependencies: Vec<String>,
    pub criticality: Criticality,
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("dependencies", &self.dependencies)
            .field("criticality", &self.criticality)
            .finish()
    }
}

/// Mutable state of the walk; written only by the walk and by shutdown
#[derive(Debug, Default)]
pub(super) struct BootstrapState {
    pub started: bool,
    pub initialized: bool,
    pub shut_down: bool,
    pub order: Vec<String>,
    pub processed: Vec<String>,
    pub processed_set: HashSet<String>,
    pub failures: Vec<ServiceFailure>,
    pub slow: Vec<String>,
    pub duration_ms: Option<u64>,
    /// Error that ended the last walk, returned again on retry
    pub fatal: Option<BootstrapError>,
}

impl BootstrapState {
    pub fn mark_processed(&mut self, name: &str) {
        if self.processed_set.insert(name.to_string()) {
            self.processed.push(name.to_string());
        }
    }

    pub fn is_processed(&self, name: &str) -> bool {
        self.processed_set.contains(name)
    }

    pub fn failure(&self, name: &str) -> Option<&ServiceFailure> {
        self.failures.iter().find(|f| f.service == name)
    }

    pub fn report(&self) -> BootstrapReport {
        BootstrapReport {
            initialized: self.initialized,
            order: self.order.clone(),
            processed: self.processed.clone(),
            failed: self.failures.clone(),
            slow: self.slow.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Typed handle to a registered service
///
/// Returned by `ServiceRegistry::register`, so code wired at the composition
/// root never needs a by-name lookup or a downcast.
#[derive(Debug)]
pub struct ServiceHandle<S> {
    name: Arc<str>,
    service: Arc<S>,
}

impl<S> ServiceHandle<S> {
    pub(super) fn new(name: &str, service: Arc<S>) -> Self {
        Self {
            name: Arc::from(name),
            service,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> &Arc<S> {
        &self.service
    }

    pub fn into_inner(self) -> Arc<S> {
        self.service
    }
}

impl<S> Clone for ServiceHandle<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            service: self.service.clone(),
        }
    }
}

impl<S> Deref for ServiceHandle<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.service
    }
}
