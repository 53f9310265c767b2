//! Service registry: registration and typed lookup

use super::service::ManagedService;
use super::types::{
    BootstrapReport, BootstrapState, Criticality, ServiceDescriptor, ServiceFailure,
    ServiceHandle,
};
use crate::config::BootstrapConfig;
use crate::utils::error::{BootstrapError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registered services in registration order
#[derive(Debug, Default)]
pub(super) struct RegistryInner {
    pub services: Vec<ServiceDescriptor>,
    pub index: HashMap<String, usize>,
}

impl RegistryInner {
    pub fn find(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.index.get(name).map(|&i| &self.services[i])
    }
}

/// Dependency-ordered registry of process-wide services
///
/// Constructed once by the composition root and shared by reference; there is
/// no global instance.
#[derive(Debug)]
pub struct ServiceRegistry {
    pub(super) config: BootstrapConfig,
    pub(super) inner: RwLock<RegistryInner>,
    pub(super) state: RwLock<BootstrapState>,
    /// Serializes `initialize_all` and `shutdown`
    pub(super) walk_lock: tokio::sync::Mutex<()>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(RegistryInner::default()),
            state: RwLock::new(BootstrapState::default()),
            walk_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Bootstrap configuration in effect
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Register a service under a unique name
    ///
    /// Duplicate names are rejected, as is registration once the walk has
    /// started. Dependencies are resolved lazily by `initialize_all`, so they
    /// may be registered in any order.
    pub fn register<S>(
        &self,
        name: &str,
        service: Arc<S>,
        dependencies: &[&str],
        criticality: Criticality,
    ) -> Result<ServiceHandle<S>>
    where
        S: ManagedService,
    {
        if self.state.read().started {
            return Err(BootstrapError::RegistrationClosed(name.to_string()).into());
        }

        let mut inner = self.inner.write();
        if inner.index.contains_key(name) {
            return Err(BootstrapError::DuplicateService(name.to_string()).into());
        }

        debug!(
            "Registering {} service '{}' (depends on {:?})",
            criticality, name, dependencies
        );

        let descriptor = ServiceDescriptor {
            name: name.to_string(),
            service: service.clone(),
            instance: service.clone(),
            type_name: std::any::type_name::<S>(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            criticality,
        };

        let position = inner.services.len();
        inner.services.push(descriptor);
        inner.index.insert(name.to_string(), position);

        Ok(ServiceHandle::new(name, service))
    }

    /// Look up a service by name and concrete type
    pub fn get<S>(&self, name: &str) -> Result<Arc<S>>
    where
        S: ManagedService,
    {
        let inner = self.inner.read();
        let descriptor = inner
            .find(name)
            .ok_or_else(|| BootstrapError::NotFound(name.to_string()))?;

        descriptor
            .instance
            .clone()
            .downcast::<S>()
            .map_err(|_| {
                BootstrapError::TypeMismatch {
                    service: name.to_string(),
                    expected: std::any::type_name::<S>(),
                }
                .into()
            })
    }

    /// Look up a service by name through its lifecycle interface
    pub fn get_dyn(&self, name: &str) -> Result<Arc<dyn ManagedService>> {
        self.inner
            .read()
            .find(name)
            .map(|d| d.service.clone())
            .ok_or_else(|| BootstrapError::NotFound(name.to_string()).into())
    }

    /// Whether a service is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().index.contains_key(name)
    }

    /// Criticality a service was registered with
    pub fn criticality(&self, name: &str) -> Option<Criticality> {
        self.inner.read().find(name).map(|d| d.criticality)
    }

    /// Registered names in registration order
    pub fn service_names(&self) -> Vec<String> {
        self.inner
            .read()
            .services
            .iter()
            .map(|d| d.name.clone())
            .collect()
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.inner.read().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the initialization walk completed
    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    /// Services the walk has attempted, successful or not
    pub fn initialized_services(&self) -> Vec<String> {
        self.state.read().processed.clone()
    }

    /// Names of services whose initializer failed or timed out
    pub fn failed_services(&self) -> Vec<String> {
        self.state
            .read()
            .failures
            .iter()
            .map(|f| f.service.clone())
            .collect()
    }

    /// Failure records, in the order they happened
    pub fn failures(&self) -> Vec<ServiceFailure> {
        self.state.read().failures.clone()
    }

    /// Snapshot of the bootstrap state
    pub fn report(&self) -> BootstrapReport {
        self.state.read().report()
    }

    pub(super) fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner.read().services.clone()
    }
}
