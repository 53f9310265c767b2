//! Concurrent health check across registered services

use super::lifecycle::panic_message;
use super::registry::ServiceRegistry;
use super::types::{HealthSnapshot, ServiceHealth};
use crate::utils::error::FormulaError;
use futures::future::join_all;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use tokio::time::Instant;
use tracing::{debug, warn};

impl ServiceRegistry {
    /// Probe every registered service concurrently
    ///
    /// Never fails: a probe that errors, panics or exceeds the probe timeout
    /// produces an `error` entry. Services that did not initialize are
    /// reported as `error` without being probed.
    pub async fn perform_health_check(&self) -> HealthSnapshot {
        let started = Instant::now();
        let probe_timeout = self.config.health_probe_timeout();

        let probes = self.descriptors().into_iter().map(|descriptor| {
            let unavailable = {
                let state = self.state.read();
                match state.failure(&descriptor.name) {
                    Some(failure) => Some(format!("initialization failed: {}", failure.reason)),
                    None if !state.is_processed(&descriptor.name) => {
                        Some("not initialized".to_string())
                    }
                    None => None,
                }
            };

            async move {
                let name = descriptor.name;
                if let Some(detail) = unavailable {
                    return (name, ServiceHealth::error(detail, 0));
                }

                let probe_started = Instant::now();
                let probe = AssertUnwindSafe(descriptor.service.health_check()).catch_unwind();
                let outcome = tokio::time::timeout(probe_timeout, probe).await;
                let elapsed_ms = probe_started.elapsed().as_millis() as u64;

                let health = match outcome {
                    Ok(Ok(Ok(report))) => ServiceHealth::from_report(report, elapsed_ms),
                    Ok(Ok(Err(e))) => {
                        warn!("Health probe for '{}' failed: {}", name, e);
                        ServiceHealth::error(e.to_string(), elapsed_ms)
                    }
                    Ok(Err(panic)) => {
                        let detail = format!("health probe panicked: {}", panic_message(&*panic));
                        warn!("Health probe for '{}' panicked", name);
                        ServiceHealth::error(detail, elapsed_ms)
                    }
                    Err(_) => {
                        warn!("Health probe for '{}' timed out", name);
                        let error = FormulaError::timeout(format!(
                            "health probe timed out after {:?}",
                            probe_timeout
                        ));
                        ServiceHealth::error(error.to_string(), elapsed_ms)
                    }
                };
                (name, health)
            }
        });

        let services: BTreeMap<String, ServiceHealth> = join_all(probes).await.into_iter().collect();
        let snapshot = HealthSnapshot::aggregate(services, started.elapsed().as_millis() as u64);

        debug!(
            "Health check: {}/{} services operational",
            snapshot.healthy_services, snapshot.total_services
        );
        snapshot
    }
}
