//! Service registry and bootstrapper
//!
//! Services are registered with their dependencies and criticality, started
//! in dependency order under per-service and whole-walk timeouts, probed
//! concurrently for health, and stopped in reverse order.

mod health;
mod lifecycle;
mod order;
mod registry;
mod service;
mod types;

pub use registry::ServiceRegistry;
pub use service::ManagedService;
pub use types::{
    BootstrapReport, Criticality, HealthSnapshot, HealthState, ServiceFailure, ServiceHandle,
    ServiceHealth, ServiceHealthReport, ServiceStatus, ShutdownReport,
};
