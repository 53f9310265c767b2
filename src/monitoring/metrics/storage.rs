//! Types for metrics storage

use super::ema::Ema;
use crate::monitoring::types::{RealtimeMetrics, SystemMetrics, TimePoint};
use std::collections::VecDeque;

/// Consolidated metrics storage - single lock for all metric groups
#[derive(Debug)]
pub(super) struct MetricsStorage {
    pub(super) system: SystemMetrics,
    pub(super) request: RequestStats,
    pub(super) database: DatabaseStats,
    pub(super) realtime: RealtimeMetrics,
    pub(super) cpu_history: VecDeque<TimePoint>,
    pub(super) memory_history: VecDeque<TimePoint>,
    pub(super) samples_collected: u64,
}

impl MetricsStorage {
    pub(super) fn new(alpha: f64, capacity: usize) -> Self {
        Self {
            system: SystemMetrics::default(),
            request: RequestStats::new(alpha),
            database: DatabaseStats::new(alpha),
            realtime: RealtimeMetrics::default(),
            cpu_history: VecDeque::with_capacity(capacity),
            memory_history: VecDeque::with_capacity(capacity),
            samples_collected: 0,
        }
    }
}

/// Running request counters
#[derive(Debug)]
pub(super) struct RequestStats {
    pub(super) total: u64,
    pub(super) errors: u64,
    pub(super) response_time: Ema,
    pub(super) min: Option<f64>,
    pub(super) max: Option<f64>,
}

impl RequestStats {
    fn new(alpha: f64) -> Self {
        Self {
            total: 0,
            errors: 0,
            response_time: Ema::new(alpha),
            min: None,
            max: None,
        }
    }

    pub(super) fn error_rate_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.errors as f64 / self.total as f64 * 100.0
        }
    }
}

/// Running database counters
#[derive(Debug)]
pub(super) struct DatabaseStats {
    pub(super) count: u64,
    pub(super) slow: u64,
    pub(super) query_time: Ema,
}

impl DatabaseStats {
    fn new(alpha: f64) -> Self {
        Self {
            count: 0,
            slow: 0,
            query_time: Ema::new(alpha),
        }
    }
}
