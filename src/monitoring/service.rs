//! Performance monitor: the registered service that drives collection,
//! aggregation and retention

use super::alerts::{Alert, AlertManager, builtin_rules};
use super::metrics::{HostSystemProbe, MetricsCollector, SystemProbe};
use super::sources::{HISTORY_KEY, RealtimeStatsSource, SNAPSHOT_KEY, SnapshotStore};
use super::types::{MetricSnapshot, MonitorState, MonitoringStatus, PerformanceTrends};
use crate::bootstrap::{ManagedService, ServiceHealthReport};
use crate::config::MonitoringConfig;
use crate::utils::error::{FormulaError, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Builder for [`PerformanceMonitor`]
pub struct PerformanceMonitorBuilder {
    config: MonitoringConfig,
    probe: Option<Arc<dyn SystemProbe>>,
    store: Option<Arc<dyn SnapshotStore>>,
    realtime: Option<Arc<dyn RealtimeStatsSource>>,
}

impl PerformanceMonitorBuilder {
    /// Replace the host probe, e.g. with a fixed reading in tests
    pub fn probe(mut self, probe: Arc<dyn SystemProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Where aggregated snapshots are written
    pub fn store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Where realtime gauges are read from on every collection tick
    pub fn realtime(mut self, source: Arc<dyn RealtimeStatsSource>) -> Self {
        self.realtime = Some(source);
        self
    }

    pub fn build(self) -> PerformanceMonitor {
        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(HostSystemProbe::new(self.config.cpu_sample_window())));

        PerformanceMonitor {
            inner: Arc::new(MonitorInner {
                collector: MetricsCollector::new(&self.config),
                alerts: AlertManager::new(self.config.alert_cooldown()),
                probe,
                store: self.store,
                realtime: self.realtime,
                config: self.config,
            }),
            active: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
            started_at: Mutex::new(None),
        }
    }
}

/// State shared with the background loops
struct MonitorInner {
    collector: MetricsCollector,
    alerts: AlertManager,
    probe: Arc<dyn SystemProbe>,
    store: Option<Arc<dyn SnapshotStore>>,
    realtime: Option<Arc<dyn RealtimeStatsSource>>,
    config: MonitoringConfig,
}

impl MonitorInner {
    async fn collect(&self) -> Vec<Alert> {
        let sample = self.probe.sample().await;

        if let Some(source) = &self.realtime {
            let stats = source.realtime_stats();
            self.collector.update_realtime_metrics(
                stats.active_connections,
                stats.messages_per_second,
                stats.avg_latency_ms,
            );
        }

        debug!(
            "Collected system sample: cpu {:.1}%, memory {:.1}%",
            sample.cpu_percent, sample.memory_percent
        );
        self.collector.record_system_sample(sample);

        let snapshot = self.collector.current_metrics();
        let raised = self.alerts.evaluate(&snapshot);
        if !raised.is_empty() {
            self.alerts.dispatch(&raised).await;
        }
        raised
    }

    async fn aggregate(&self) -> MetricSnapshot {
        let snapshot = self.collector.current_metrics();
        if let Err(e) = self.persist(&snapshot).await {
            warn!("Failed to persist metrics snapshot: {}", e);
        }
        snapshot
    }

    async fn persist(&self, snapshot: &MetricSnapshot) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        store
            .put(
                SNAPSHOT_KEY,
                serde_json::to_value(snapshot)?,
                self.config.snapshot_ttl(),
            )
            .await
            .map_err(|e| persist_error(SNAPSHOT_KEY, e))?;

        let history = serde_json::json!({
            "cpu": self.collector.cpu_history(),
            "memory": self.collector.memory_history(),
        });
        store
            .put(HISTORY_KEY, history, self.config.history_ttl())
            .await
            .map_err(|e| persist_error(HISTORY_KEY, e))?;

        debug!("Persisted metrics snapshot");
        Ok(())
    }

    fn retain(&self) -> usize {
        let period = chrono::Duration::seconds(self.config.retention_period_secs as i64);
        let cutoff = Utc::now() - period;

        let points = self.collector.purge_history_older_than(cutoff);
        let alerts = self.alerts.purge_older_than(cutoff);
        if points + alerts > 0 {
            info!(
                "Retention removed {} historical points and {} alerts",
                points, alerts
            );
        }
        points + alerts
    }
}

/// Periodically samples the host, evaluates alert rules and persists snapshots
///
/// Request and query timings are recorded synchronously through
/// [`track_request`](Self::track_request) and
/// [`track_database_query`](Self::track_database_query).
pub struct PerformanceMonitor {
    inner: Arc<MonitorInner>,
    active: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    started_at: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("active", &self.is_active())
            .field("samples", &self.inner.collector.samples_collected())
            .field("active_alerts", &self.inner.alerts.active_count())
            .finish()
    }
}

impl PerformanceMonitor {
    pub fn builder(config: MonitoringConfig) -> PerformanceMonitorBuilder {
        PerformanceMonitorBuilder {
            config,
            probe: None,
            store: None,
            realtime: None,
        }
    }

    /// Monitor sampling the host, with no store or realtime source attached
    pub fn new(config: MonitoringConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.inner.config
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.inner.alerts
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.inner.collector
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn track_request(&self, response_time_ms: f64, is_error: bool) {
        self.inner.collector.track_request(response_time_ms, is_error);
    }

    pub fn track_database_query(&self, query_time_ms: f64, is_slow: bool) {
        self.inner.collector.track_database_query(query_time_ms, is_slow);
    }

    pub fn update_realtime_metrics(
        &self,
        active_connections: u64,
        messages_per_second: f64,
        avg_latency_ms: f64,
    ) {
        self.inner
            .collector
            .update_realtime_metrics(active_connections, messages_per_second, avg_latency_ms);
    }

    pub fn current_metrics(&self) -> MetricSnapshot {
        self.inner.collector.current_metrics()
    }

    pub fn performance_trends(&self) -> PerformanceTrends {
        PerformanceTrends {
            cpu: self.inner.collector.cpu_history(),
            memory: self.inner.collector.memory_history(),
            alerts: self.inner.alerts.history(None),
            thresholds: self.inner.config.thresholds.clone(),
        }
    }

    pub fn service_status(&self) -> MonitoringStatus {
        let status = if self.is_active() {
            MonitorState::Operational
        } else {
            MonitorState::Initializing
        };
        let monitoring_intervals = self
            .tasks
            .lock()
            .iter()
            .filter(|t| !t.is_finished())
            .count();
        let uptime_seconds = self
            .started_at
            .lock()
            .map_or(0, |started| started.elapsed().as_secs());
        let stats = self.inner.alerts.stats();

        MonitoringStatus {
            status,
            metrics_collected: self.inner.collector.samples_collected(),
            active_alerts: self.inner.alerts.active_count(),
            total_alerts: stats.total_alerts,
            monitoring_intervals,
            uptime_seconds,
        }
    }

    /// One collection tick; returns the alerts it raised
    pub async fn collect_once(&self) -> Vec<Alert> {
        self.inner.collect().await
    }

    /// One aggregation tick; persistence failures are logged, not returned
    pub async fn aggregate_once(&self) -> MetricSnapshot {
        self.inner.aggregate().await
    }

    /// One retention tick; returns how many points and alerts were purged
    pub fn retain_once(&self) -> usize {
        self.inner.retain()
    }

    fn spawn_loop<F, Fut>(&self, name: &'static str, period: Duration, tick: F) -> JoinHandle<()>
    where
        F: Fn(Arc<MonitorInner>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                debug!("Running {} tick", name);
                tick(inner.clone()).await;
            }
        })
    }
}

#[async_trait]
impl ManagedService for PerformanceMonitor {
    async fn initialize(&self) -> Result<()> {
        if self.active.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let config = &self.inner.config;
        self.inner.alerts.add_rules(builtin_rules(&config.thresholds));

        let handles = vec![
            self.spawn_loop("collection", config.collection_interval(), |inner| async move {
                inner.collect().await;
            }),
            self.spawn_loop("aggregation", config.aggregation_interval(), |inner| async move {
                inner.aggregate().await;
            }),
            self.spawn_loop("retention", config.retention_interval(), |inner| async move {
                inner.retain();
            }),
        ];
        self.tasks.lock().extend(handles);
        *self.started_at.lock() = Some(Instant::now());

        info!(
            "Performance monitoring started (collection every {}s, aggregation every {}s)",
            config.collection_interval_secs, config.aggregation_interval_secs
        );
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if !self.active.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.inner.aggregate().await;

        self.inner.collector.reset();
        self.inner.alerts.clear();
        *self.started_at.lock() = None;

        info!("Performance monitoring stopped");
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealthReport> {
        let status = self.service_status();
        let report = match status.status {
            MonitorState::Operational => ServiceHealthReport::operational(),
            MonitorState::Initializing => ServiceHealthReport::error("initializing"),
        };
        Ok(report
            .with_metadata("metrics_collected", serde_json::json!(status.metrics_collected))
            .with_metadata("active_alerts", serde_json::json!(status.active_alerts)))
    }
}

fn persist_error(key: &str, source: FormulaError) -> FormulaError {
    FormulaError::monitoring(format!("failed to persist {}: {}", key, source))
}
