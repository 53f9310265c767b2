//! Errors raised while wiring and starting services

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the service registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// A critical service failed or timed out during initialization
    #[error("Critical service '{service}' failed to initialize: {reason}")]
    CriticalServiceFailure { service: String, reason: String },

    /// The whole initialization walk exceeded its budget
    #[error("Bootstrap did not complete within {timeout:?}")]
    BootstrapTimeout { timeout: Duration },

    /// A single service initializer exceeded its budget
    #[error("Service '{service}' did not initialize within {timeout:?}")]
    ServiceTimeout { service: String, timeout: Duration },

    /// The dependency graph contains a cycle
    #[error("Dependency cycle detected: {}", .path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    /// A service depends on a name that was never registered
    #[error("Service '{service}' depends on unregistered service '{dependency}'")]
    UnknownDependency { service: String, dependency: String },

    /// A service name was registered twice
    #[error("Service '{0}' is already registered")]
    DuplicateService(String),

    /// Registration attempted after the walk started
    #[error("Cannot register '{0}': bootstrap already started")]
    RegistrationClosed(String),

    /// Lookup of an unknown service
    #[error("Service '{0}' is not registered")]
    NotFound(String),

    /// Lookup with the wrong concrete type
    #[error("Service '{service}' is not a {expected}")]
    TypeMismatch {
        service: String,
        expected: &'static str,
    },
}

impl BootstrapError {
    /// Whether the error must stop the process from serving traffic
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CriticalServiceFailure { .. }
                | Self::BootstrapTimeout { .. }
                | Self::DependencyCycle { .. }
                | Self::UnknownDependency { .. }
        )
    }

    /// Name of the service the error refers to, when there is one
    pub fn service_name(&self) -> Option<&str> {
        match self {
            Self::CriticalServiceFailure { service, .. }
            | Self::ServiceTimeout { service, .. }
            | Self::UnknownDependency { service, .. }
            | Self::TypeMismatch { service, .. } => Some(service),
            Self::DuplicateService(name)
            | Self::RegistrationClosed(name)
            | Self::NotFound(name) => Some(name),
            Self::BootstrapTimeout { .. } | Self::DependencyCycle { .. } => None,
        }
    }
}
