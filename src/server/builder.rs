//! Composition root: builds the services, registers them and runs the server

use crate::bootstrap::{Criticality, ServiceRegistry};
use crate::config::Config;
use crate::monitoring::PerformanceMonitor;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::services::{
    Job, JobHandler, JobQueue, NOTIFICATIONS_QUEUE, RealtimeHub, SnapshotCache,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const CACHE_SERVICE: &str = "cache";
pub const REALTIME_SERVICE: &str = "realtime";
pub const JOBS_SERVICE: &str = "jobs";
pub const PERFORMANCE_SERVICE: &str = "performance";

/// Logs notifications delivered through the job queue
#[derive(Debug)]
struct NotificationLogger;

#[async_trait]
impl JobHandler for NotificationLogger {
    async fn handle(&self, job: &Job) -> Result<()> {
        let title = job.payload["title"].as_str().unwrap_or("notification");
        let message = job.payload["message"].as_str().unwrap_or_default();
        warn!("Notification {}: {}", title, message);
        Ok(())
    }
}

/// Every service of the process, registered but not yet initialized
#[derive(Debug, Clone)]
pub struct Runtime {
    pub registry: Arc<ServiceRegistry>,
    pub cache: Arc<SnapshotCache>,
    pub realtime: Arc<RealtimeHub>,
    pub jobs: Arc<JobQueue>,
    /// Absent when monitoring is disabled
    pub monitor: Option<Arc<PerformanceMonitor>>,
}

impl Runtime {
    /// Build and register the services described by `config`
    pub fn build(config: &Config) -> Result<Self> {
        let registry = Arc::new(ServiceRegistry::new(config.bootstrap().clone()));

        let cache = Arc::new(SnapshotCache::default());
        let realtime = Arc::new(RealtimeHub::new(config.realtime()));
        let jobs = Arc::new(JobQueue::new(config.jobs()));
        jobs.register_handler(NOTIFICATIONS_QUEUE, Arc::new(NotificationLogger));

        registry.register(CACHE_SERVICE, cache.clone(), &[], Criticality::Critical)?;
        registry.register(REALTIME_SERVICE, realtime.clone(), &[], Criticality::Optional)?;
        registry.register(
            JOBS_SERVICE,
            jobs.clone(),
            &[CACHE_SERVICE],
            Criticality::Optional,
        )?;

        let monitor = if config.monitoring().enabled {
            let monitor = Arc::new(
                PerformanceMonitor::builder(config.monitoring().clone())
                    .store(cache.clone())
                    .realtime(realtime.clone())
                    .build(),
            );
            monitor.alerts().add_notifier(realtime.clone());
            monitor.alerts().add_notifier(jobs.clone());

            registry.register(
                PERFORMANCE_SERVICE,
                monitor.clone(),
                &[CACHE_SERVICE, REALTIME_SERVICE, JOBS_SERVICE],
                Criticality::Optional,
            )?;
            Some(monitor)
        } else {
            info!("Performance monitoring disabled");
            None
        };

        Ok(Self {
            registry,
            cache,
            realtime,
            jobs,
            monitor,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.registry.clone(), self.monitor.clone())
    }
}

/// Bootstrap every service, serve HTTP until interrupted, then shut down
///
/// A fatal bootstrap error shuts down whatever had started and is returned.
pub async fn run_server(config: Config) -> Result<()> {
    let runtime = Runtime::build(&config)?;

    match runtime.registry.initialize_all().await {
        Ok(report) => {
            if !report.failed.is_empty() {
                warn!(
                    "Started with {} failed optional service(s): {:?}",
                    report.failed.len(),
                    report.failed.iter().map(|f| &f.service).collect::<Vec<_>>()
                );
            }
        }
        Err(e) => {
            error!("Bootstrap failed: {}", e);
            runtime.registry.shutdown().await;
            return Err(e);
        }
    }

    let served = HttpServer::new(config.server().clone(), runtime.app_state())
        .start()
        .await;

    let report = runtime.registry.shutdown().await;
    if !report.failures.is_empty() {
        warn!("Shutdown completed with failures: {:?}", report.failures);
    }

    served
}
