//! Test fixtures: scripted services and metric snapshots
//!
//! All doubles are real `ManagedService` implementations, not mocks.

use async_trait::async_trait;
use formula_core::bootstrap::{ManagedService, ServiceHealthReport};
use formula_core::monitoring::{MetricSnapshot, RequestMetrics, SystemMetrics};
use formula_core::{FormulaError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shared, ordered record of lifecycle events such as `init:cache`
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// What a scripted initializer does
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Succeed,
    Fail(&'static str),
    /// Never completes
    Hang,
    /// Completes after the given delay
    Sleep(Duration),
}

/// Service whose initializer follows a script and logs every lifecycle call
#[derive(Debug)]
pub struct ScriptedService {
    name: String,
    step: Step,
    healthy: bool,
    log: EventLog,
    init_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new(name: &str, step: Step, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            step,
            healthy: true,
            log: log.clone(),
            init_calls: AtomicUsize::new(0),
        })
    }

    /// A service that starts but reports `error` from its health probe
    pub fn unhealthy(name: &str, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            step: Step::Succeed,
            healthy: false,
            log: log.clone(),
            init_calls: AtomicUsize::new(0),
        })
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    fn record(&self, event: &str) {
        self.log.lock().push(format!("{}:{}", event, self.name));
    }
}

#[async_trait]
impl ManagedService for ScriptedService {
    async fn initialize(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.record("init");

        match self.step {
            Step::Succeed => {}
            Step::Fail(reason) => return Err(FormulaError::service_init(reason)),
            Step::Hang => std::future::pending::<()>().await,
            Step::Sleep(delay) => tokio::time::sleep(delay).await,
        }

        self.record("ready");
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.record("stop");
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealthReport> {
        Ok(if self.healthy {
            ServiceHealthReport::operational()
        } else {
            ServiceHealthReport::error("scripted failure")
        })
    }
}

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Position of `event` in the log
pub fn position(log: &EventLog, event: &str) -> Option<usize> {
    log.lock().iter().position(|e| e == event)
}

/// Snapshot with the given system and request readings
pub fn snapshot_with(cpu: f64, memory: f64, response_ms: f64, error_rate: f64) -> MetricSnapshot {
    MetricSnapshot {
        system: SystemMetrics {
            cpu_percent: cpu,
            memory_percent: memory,
            ..SystemMetrics::default()
        },
        requests: RequestMetrics {
            avg_response_time_ms: response_ms,
            error_rate_percent: error_rate,
            ..RequestMetrics::default()
        },
        ..MetricSnapshot::default()
    }
}
