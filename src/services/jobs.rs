//! Background job queue with a single dispatching worker

use crate::bootstrap::{ManagedService, ServiceHealthReport};
use crate::config::JobsConfig;
use crate::monitoring::alerts::{AlertNotifier, AlertSeverity, Notification};
use crate::utils::error::{FormulaError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Queue that critical-alert notifications are enqueued to
pub const NOTIFICATIONS_QUEUE: &str = "notifications";

/// A unit of background work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub queue: String,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
}

/// Processes jobs of one named queue
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> Result<()>;
}

/// Job counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobStats {
    pub enqueued: u64,
    pub processed: u64,
    pub failed: u64,
    /// Jobs for queues without a handler
    pub unhandled: u64,
}

#[derive(Debug, Default)]
struct JobCounters {
    enqueued: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    unhandled: AtomicU64,
}

type HandlerMap = Arc<RwLock<HashMap<String, Arc<dyn JobHandler>>>>;

/// Bounded in-process job queue
///
/// Jobs are accepted only while the worker runs. Shutdown closes the channel
/// and waits for the worker to drain what was already accepted.
pub struct JobQueue {
    capacity: usize,
    sender: RwLock<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    handlers: HandlerMap,
    counters: Arc<JobCounters>,
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("capacity", &self.capacity)
            .field("queues", &self.handlers.read().keys().collect::<Vec<_>>())
            .field("stats", &self.stats())
            .finish()
    }
}

impl JobQueue {
    pub fn new(config: &JobsConfig) -> Self {
        Self {
            capacity: config.queue_capacity.max(1),
            sender: RwLock::new(None),
            worker: Mutex::new(None),
            handlers: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(JobCounters::default()),
        }
    }

    /// Route jobs of `queue` to `handler`, replacing any previous handler
    pub fn register_handler(&self, queue: impl Into<String>, handler: Arc<dyn JobHandler>) {
        let queue = queue.into();
        debug!("Registering job handler for queue '{}'", queue);
        self.handlers.write().insert(queue, handler);
    }

    /// Accept a job without waiting; fails when the queue is full or stopped
    pub fn enqueue(&self, queue: &str, payload: serde_json::Value) -> Result<Uuid> {
        let sender = self
            .sender
            .read()
            .clone()
            .ok_or_else(|| FormulaError::queue("job queue is not running"))?;

        let job = Job {
            id: Uuid::new_v4(),
            queue: queue.to_string(),
            payload,
            enqueued_at: Utc::now(),
        };
        let id = job.id;

        sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => FormulaError::queue("job queue is full"),
            mpsc::error::TrySendError::Closed(_) => FormulaError::queue("job queue is closed"),
        })?;

        self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
        debug!("Enqueued job {} on '{}'", id, queue);
        Ok(id)
    }

    pub fn stats(&self) -> JobStats {
        JobStats {
            enqueued: self.counters.enqueued.load(Ordering::Relaxed),
            processed: self.counters.processed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            unhandled: self.counters.unhandled.load(Ordering::Relaxed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }
}

async fn run_worker(mut receiver: mpsc::Receiver<Job>, handlers: HandlerMap, counters: Arc<JobCounters>) {
    while let Some(job) = receiver.recv().await {
        let handler = handlers.read().get(&job.queue).cloned();
        let Some(handler) = handler else {
            warn!("No handler for queue '{}', dropping job {}", job.queue, job.id);
            counters.unhandled.fetch_add(1, Ordering::Relaxed);
            continue;
        };

        match AssertUnwindSafe(handler.handle(&job)).catch_unwind().await {
            Ok(Ok(())) => {
                counters.processed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Err(e)) => {
                warn!("Job {} on '{}' failed: {}", job.id, job.queue, e);
                counters.failed.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                warn!("Job {} on '{}' panicked", job.id, job.queue);
                counters.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
    debug!("Job worker exiting");
}

#[async_trait]
impl AlertNotifier for JobQueue {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.enqueue(NOTIFICATIONS_QUEUE, serde_json::to_value(notification)?)
            .map(|_| ())
    }

    fn name(&self) -> &str {
        "jobs"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= AlertSeverity::Critical
    }
}

#[async_trait]
impl ManagedService for JobQueue {
    async fn initialize(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Ok(());
        }

        let (sender, receiver) = mpsc::channel(self.capacity);
        *self.sender.write() = Some(sender);
        *worker = Some(tokio::spawn(run_worker(
            receiver,
            self.handlers.clone(),
            self.counters.clone(),
        )));

        info!("Job queue started (capacity {})", self.capacity);
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.sender.write().take();
        let worker = self.worker.lock().take();

        if let Some(worker) = worker {
            worker
                .await
                .map_err(|e| FormulaError::queue(format!("job worker failed: {}", e)))?;
        }

        info!("Job queue stopped");
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealthReport> {
        let stats = self.stats();
        let report = if self.is_running() {
            ServiceHealthReport::operational()
        } else {
            ServiceHealthReport::error("worker not running")
        };
        Ok(report.with_metadata("stats", serde_json::to_value(stats)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Job>>,
    }

    #[async_trait]
    impl JobHandler for Recorder {
        async fn handle(&self, job: &Job) -> Result<()> {
            self.seen.lock().push(job.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl JobHandler for Failing {
        async fn handle(&self, _job: &Job) -> Result<()> {
            Err(FormulaError::internal("handler failed"))
        }
    }

    fn queue(capacity: usize) -> JobQueue {
        JobQueue::new(&JobsConfig {
            queue_capacity: capacity,
        })
    }

    #[tokio::test]
    async fn test_jobs_reach_their_handler() {
        let jobs = queue(16);
        let recorder = Arc::new(Recorder::default());
        jobs.register_handler("email", recorder.clone());
        jobs.initialize().await.unwrap();

        let id = jobs.enqueue("email", json!({"to": "site@example.com"})).unwrap();
        jobs.shutdown().await.unwrap();

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, id);
        assert_eq!(seen[0].payload["to"], "site@example.com");
        assert_eq!(jobs.stats().processed, 1);
    }

    #[tokio::test]
    async fn test_failures_and_unhandled_are_counted() {
        let jobs = queue(16);
        jobs.register_handler("broken", Arc::new(Failing));
        jobs.initialize().await.unwrap();

        jobs.enqueue("broken", json!(null)).unwrap();
        jobs.enqueue("nobody", json!(null)).unwrap();
        jobs.shutdown().await.unwrap();

        let stats = jobs.stats();
        assert_eq!(stats.enqueued, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.unhandled, 1);
    }

    #[tokio::test]
    async fn test_enqueue_requires_running_worker() {
        let jobs = queue(4);
        assert!(matches!(
            jobs.enqueue("email", json!(1)),
            Err(FormulaError::Queue(_))
        ));

        jobs.initialize().await.unwrap();
        jobs.shutdown().await.unwrap();
        assert!(jobs.enqueue("email", json!(1)).is_err());
        assert!(!jobs.is_running());
    }

    #[tokio::test]
    async fn test_full_queue_rejects() {
        let jobs = queue(1);
        jobs.initialize().await.unwrap();

        // The worker has not run yet on this single-threaded runtime
        jobs.enqueue("a", json!(1)).unwrap();
        let err = jobs.enqueue("a", json!(2)).unwrap_err();
        assert!(err.to_string().contains("full"));
    }

    #[tokio::test]
    async fn test_notifier_enqueues_notifications() {
        let jobs = queue(8);
        let recorder = Arc::new(Recorder::default());
        jobs.register_handler(NOTIFICATIONS_QUEUE, recorder.clone());
        jobs.initialize().await.unwrap();

        let notification = Notification::new("performance_alert", "CPU", "CPU is critical");
        jobs.send(&notification).await.unwrap();
        jobs.shutdown().await.unwrap();

        let seen = recorder.seen.lock();
        let delivered: Notification = serde_json::from_value(seen[0].payload.clone()).unwrap();
        assert_eq!(delivered, notification);
    }

    #[tokio::test]
    async fn test_health_reflects_worker() {
        let jobs = queue(8);
        assert_eq!(
            jobs.health_check().await.unwrap().status,
            crate::bootstrap::ServiceStatus::Error
        );

        jobs.initialize().await.unwrap();
        assert!(jobs.is_running());
        assert_eq!(
            jobs.health_check().await.unwrap().status,
            crate::bootstrap::ServiceStatus::Operational
        );
        jobs.shutdown().await.unwrap();
    }
}
