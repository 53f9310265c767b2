//! Initialization walk and shutdown

use super::order::resolve_order;
use super::registry::ServiceRegistry;
use super::types::{BootstrapReport, Criticality, ServiceDescriptor, ServiceFailure, ShutdownReport};
use crate::utils::error::{BootstrapError, FormulaError, Result};
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

impl ServiceRegistry {
    /// Order in which `initialize_all` will start the registered services
    pub fn initialization_order(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        Ok(resolve_order(&inner.services)?)
    }

    /// Initialize every registered service in dependency order
    ///
    /// Returns the previous report without doing any work once the walk has
    /// completed. A fatal error is remembered and returned again on retry.
    pub async fn initialize_all(&self) -> Result<BootstrapReport> {
        let _walk = self.walk_lock.lock().await;

        {
            let state = self.state.read();
            if state.initialized {
                debug!("Services already initialized, skipping bootstrap");
                return Ok(state.report());
            }
            if let Some(fatal) = &state.fatal {
                return Err(fatal.clone().into());
            }
        }

        let descriptors = self.descriptors();
        let order = match resolve_order(&descriptors) {
            Ok(order) => order,
            Err(e) => {
                error!("Cannot bootstrap services: {}", e);
                let mut state = self.state.write();
                state.started = true;
                state.fatal = Some(e.clone());
                return Err(e.into());
            }
        };

        {
            let mut state = self.state.write();
            state.started = true;
            state.order = order.clone();
        }

        info!(
            "Bootstrapping {} services: {}",
            order.len(),
            order.join(", ")
        );

        let overall = self.config.overall_timeout();
        let started = Instant::now();
        let result = match tokio::time::timeout(overall, self.walk(&descriptors, &order)).await {
            Ok(result) => result,
            Err(_) => Err(BootstrapError::BootstrapTimeout { timeout: overall }),
        };
        let elapsed = started.elapsed();

        let mut state = self.state.write();
        state.duration_ms = Some(elapsed.as_millis() as u64);

        match result {
            Ok(()) => {
                state.initialized = true;
                if state.failures.is_empty() {
                    info!("All services initialized in {:?}", elapsed);
                } else {
                    warn!(
                        "Services initialized in {:?} with {} optional failure(s)",
                        elapsed,
                        state.failures.len()
                    );
                }
                Ok(state.report())
            }
            Err(e) => {
                error!("Bootstrap aborted after {:?}: {}", elapsed, e);
                state.fatal = Some(e.clone());
                Err(e.into())
            }
        }
    }

    async fn walk(
        &self,
        descriptors: &[ServiceDescriptor],
        order: &[String],
    ) -> std::result::Result<(), BootstrapError> {
        let by_name: HashMap<&str, &ServiceDescriptor> =
            descriptors.iter().map(|d| (d.name.as_str(), d)).collect();

        for name in order {
            let Some(descriptor) = by_name.get(name.as_str()).copied() else {
                continue;
            };
            if self.state.read().is_processed(name) {
                continue;
            }

            if self.config.skip_dependents_of_failed_optional {
                let failed_dependency = {
                    let state = self.state.read();
                    descriptor
                        .dependencies
                        .iter()
                        .find(|dep| state.failure(dep).is_some())
                        .cloned()
                };
                if let Some(dependency) = failed_dependency {
                    warn!(
                        "Skipping service '{}': dependency '{}' failed",
                        name, dependency
                    );
                    self.skip_service(descriptor, &dependency)?;
                    continue;
                }
            }

            self.start_service(descriptor).await?;
        }

        Ok(())
    }

    async fn start_service(
        &self,
        descriptor: &ServiceDescriptor,
    ) -> std::result::Result<(), BootstrapError> {
        let name = descriptor.name.as_str();
        let timeout = self.config.service_timeout();
        debug!("Initializing {} service '{}'", descriptor.criticality, name);

        let started = Instant::now();
        let init = AssertUnwindSafe(descriptor.service.initialize()).catch_unwind();
        let outcome = match tokio::time::timeout(timeout, init).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(e.to_string()),
            Ok(Err(panic)) => Err(FormulaError::service_init(format!(
                "initializer panicked: {}",
                panic_message(&*panic)
            ))
            .to_string()),
            Err(_) => Err(BootstrapError::ServiceTimeout {
                service: name.to_string(),
                timeout,
            }
            .to_string()),
        };
        let elapsed = started.elapsed();

        match outcome {
            Ok(()) => {
                let mut state = self.state.write();
                if elapsed > self.config.slow_service_warning() {
                    warn!("Service '{}' was slow to initialize: {:?}", name, elapsed);
                    state.slow.push(name.to_string());
                }
                state.mark_processed(name);
                drop(state);
                info!("Service '{}' initialized in {:?}", name, elapsed);
                Ok(())
            }
            Err(reason) => self.fail_service(descriptor, reason, elapsed),
        }
    }

    fn skip_service(
        &self,
        descriptor: &ServiceDescriptor,
        dependency: &str,
    ) -> std::result::Result<(), BootstrapError> {
        let reason = format!("dependency failed: {}", dependency);
        self.fail_service(descriptor, reason, Duration::ZERO)
    }

    fn fail_service(
        &self,
        descriptor: &ServiceDescriptor,
        reason: String,
        elapsed: Duration,
    ) -> std::result::Result<(), BootstrapError> {
        let name = descriptor.name.clone();
        {
            let mut state = self.state.write();
            state.mark_processed(&name);
            state.failures.push(ServiceFailure {
                service: name.clone(),
                criticality: descriptor.criticality,
                reason: reason.clone(),
                elapsed_ms: elapsed.as_millis() as u64,
                failed_at: Utc::now(),
            });
        }

        match descriptor.criticality {
            Criticality::Critical => {
                error!("Critical service '{}' failed: {}", name, reason);
                Err(BootstrapError::CriticalServiceFailure {
                    service: name,
                    reason,
                })
            }
            Criticality::Optional => {
                warn!(
                    "Optional service '{}' failed, continuing without it: {}",
                    name, reason
                );
                Ok(())
            }
        }
    }

    /// Stop every successfully initialized service in reverse order
    ///
    /// Failures are logged and collected, never propagated. Only the first
    /// call does any work.
    pub async fn shutdown(&self) -> ShutdownReport {
        let _walk = self.walk_lock.lock().await;

        let targets: Vec<ServiceDescriptor> = {
            let mut state = self.state.write();
            if state.shut_down {
                debug!("Services already shut down");
                return ShutdownReport::default();
            }
            state.shut_down = true;
            state.started = true;

            let inner = self.inner.read();
            state
                .processed
                .iter()
                .rev()
                .filter(|name| state.failure(name).is_none())
                .filter_map(|name| inner.find(name).cloned())
                .collect()
        };

        info!("Shutting down {} services", targets.len());

        let timeout = self.config.shutdown_timeout();
        let mut report = ShutdownReport::default();

        for descriptor in targets {
            let name = descriptor.name;
            let stop = AssertUnwindSafe(descriptor.service.shutdown()).catch_unwind();
            let outcome = match tokio::time::timeout(timeout, stop).await {
                Ok(Ok(Ok(()))) => Ok(()),
                Ok(Ok(Err(e))) => Err(e.to_string()),
                Ok(Err(panic)) => Err(format!("shutdown panicked: {}", panic_message(&*panic))),
                Err(_) => Err(FormulaError::timeout(format!(
                    "shutdown did not complete within {:?}",
                    timeout
                ))
                .to_string()),
            };

            match outcome {
                Ok(()) => debug!("Service '{}' stopped", name),
                Err(reason) => {
                    warn!("Service '{}' failed to shut down: {}", name, reason);
                    report.failures.insert(name.clone(), reason);
                }
            }
            report.stopped.push(name);
        }

        info!("Shutdown complete");
        report
    }
}

pub(super) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
