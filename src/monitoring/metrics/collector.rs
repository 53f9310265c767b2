//! Metrics collector implementation for recording metrics

use super::bounded::BoundedPush;
use super::storage::MetricsStorage;
use crate::config::MonitoringConfig;
use crate::monitoring::types::{
    DatabaseMetrics, MetricSnapshot, RealtimeMetrics, RequestMetrics, SystemMetrics, TimePoint,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

/// In-memory store for every metric group
///
/// Recording methods take the write lock briefly and never await, so they are
/// safe to call from request handlers on any worker thread.
#[derive(Debug)]
pub struct MetricsCollector {
    /// All metrics storage consolidated into a single lock
    storage: RwLock<MetricsStorage>,
    alpha: f64,
    capacity: usize,
}

impl MetricsCollector {
    /// Create a collector using the smoothing factor and history size from `config`
    pub fn new(config: &MonitoringConfig) -> Self {
        Self::with_settings(config.ema_alpha, config.history_capacity)
    }

    pub fn with_settings(alpha: f64, capacity: usize) -> Self {
        Self {
            storage: RwLock::new(MetricsStorage::new(alpha, capacity)),
            alpha,
            capacity,
        }
    }

    /// Record a completed HTTP request
    pub fn track_request(&self, response_time_ms: f64, is_error: bool) {
        let mut storage = self.storage.write();
        let request = &mut storage.request;

        request.total += 1;
        if is_error {
            request.errors += 1;
        }
        request.response_time.update(response_time_ms);
        request.min = Some(request.min.map_or(response_time_ms, |m| m.min(response_time_ms)));
        request.max = Some(request.max.map_or(response_time_ms, |m| m.max(response_time_ms)));
    }

    /// Record a database query
    pub fn track_database_query(&self, query_time_ms: f64, is_slow: bool) {
        let mut storage = self.storage.write();
        let database = &mut storage.database;

        database.count += 1;
        if is_slow {
            database.slow += 1;
        }
        database.query_time.update(query_time_ms);
    }

    /// Replace the realtime gauges
    pub fn update_realtime_metrics(
        &self,
        active_connections: u64,
        messages_per_second: f64,
        avg_latency_ms: f64,
    ) {
        self.storage.write().realtime = RealtimeMetrics {
            active_connections,
            messages_per_second,
            avg_latency_ms,
        };
    }

    /// Store a system reading and append it to the cpu and memory series
    pub fn record_system_sample(&self, sample: SystemMetrics) {
        self.record_system_sample_at(sample, Utc::now());
    }

    pub fn record_system_sample_at(&self, sample: SystemMetrics, timestamp: DateTime<Utc>) {
        let mut storage = self.storage.write();

        storage.cpu_history.push_bounded(
            TimePoint {
                value: sample.cpu_percent,
                timestamp,
            },
            self.capacity,
        );
        storage.memory_history.push_bounded(
            TimePoint {
                value: sample.memory_percent,
                timestamp,
            },
            self.capacity,
        );
        storage.system = sample;
        storage.samples_collected += 1;
    }

    /// Copy of the current metrics
    pub fn current_metrics(&self) -> MetricSnapshot {
        let storage = self.storage.read();
        let request = &storage.request;
        let database = &storage.database;

        MetricSnapshot {
            timestamp: Utc::now(),
            system: storage.system.clone(),
            requests: RequestMetrics {
                total_requests: request.total,
                avg_response_time_ms: request.response_time.value(),
                min_response_time_ms: request.min.unwrap_or(0.0),
                max_response_time_ms: request.max.unwrap_or(0.0),
                error_count: request.errors,
                error_rate_percent: request.error_rate_percent(),
            },
            database: DatabaseMetrics {
                query_count: database.count,
                avg_query_time_ms: database.query_time.value(),
                slow_query_count: database.slow,
            },
            realtime: storage.realtime.clone(),
        }
    }

    pub fn cpu_history(&self) -> Vec<TimePoint> {
        self.storage.read().cpu_history.iter().copied().collect()
    }

    pub fn memory_history(&self) -> Vec<TimePoint> {
        self.storage.read().memory_history.iter().copied().collect()
    }

    /// Number of system samples recorded
    pub fn samples_collected(&self) -> u64 {
        self.storage.read().samples_collected
    }

    /// Drop series points older than `cutoff`, returning how many were removed
    pub fn purge_history_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut storage = self.storage.write();
        let before = storage.cpu_history.len() + storage.memory_history.len();

        storage.cpu_history.retain(|p| p.timestamp >= cutoff);
        storage.memory_history.retain(|p| p.timestamp >= cutoff);

        let removed = before - storage.cpu_history.len() - storage.memory_history.len();
        if removed > 0 {
            debug!("Purged {} historical points older than {}", removed, cutoff);
        }
        removed
    }

    /// Clear every metric group
    pub fn reset(&self) {
        *self.storage.write() = MetricsStorage::new(self.alpha, self.capacity);
    }

    pub fn history_capacity(&self) -> usize {
        self.capacity
    }
}
