//! Tests for metrics module

use super::*;
use crate::monitoring::types::SystemMetrics;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn reading(cpu: f64) -> SystemMetrics {
    SystemMetrics {
        cpu_percent: cpu,
        memory_percent: cpu / 2.0,
        ..SystemMetrics::default()
    }
}

#[test]
fn test_ema_sequence() {
    let mut ema = Ema::new(0.1);
    assert_close(ema.update(100.0), 10.0);
    assert_close(ema.update(200.0), 29.0);
    assert_close(ema.update(100.0), 36.1);
    assert_eq!(ema.samples(), 3);

    ema.reset();
    assert_eq!(ema.value(), 0.0);
}

#[test]
fn test_request_average_follows_ema() {
    let collector = MetricsCollector::with_settings(DEFAULT_ALPHA, DEFAULT_HISTORY_CAPACITY);
    let mut averages = Vec::new();
    for ms in [100.0, 200.0, 100.0] {
        collector.track_request(ms, false);
        averages.push(collector.current_metrics().requests.avg_response_time_ms);
    }

    assert_close(averages[0], 10.0);
    assert_close(averages[1], 29.0);
    assert_close(averages[2], 36.1);

    let requests = collector.current_metrics().requests;
    assert_eq!(requests.total_requests, 3);
    assert_eq!(requests.min_response_time_ms, 100.0);
    assert_eq!(requests.max_response_time_ms, 200.0);
}

#[test]
fn test_error_rate() {
    let collector = MetricsCollector::with_settings(DEFAULT_ALPHA, DEFAULT_HISTORY_CAPACITY);
    assert_eq!(collector.current_metrics().requests.error_rate_percent, 0.0);

    for i in 0..20 {
        collector.track_request(50.0, i % 10 == 0);
    }

    let requests = collector.current_metrics().requests;
    assert_eq!(requests.error_count, 2);
    assert_close(requests.error_rate_percent, 10.0);
}

#[test]
fn test_database_queries() {
    let collector = MetricsCollector::with_settings(0.5, DEFAULT_HISTORY_CAPACITY);
    collector.track_database_query(40.0, false);
    collector.track_database_query(1200.0, true);

    let database = collector.current_metrics().database;
    assert_eq!(database.query_count, 2);
    assert_eq!(database.slow_query_count, 1);
    assert_close(database.avg_query_time_ms, 610.0);
}

#[test]
fn test_realtime_metrics_are_replaced() {
    let collector = MetricsCollector::with_settings(DEFAULT_ALPHA, DEFAULT_HISTORY_CAPACITY);
    collector.update_realtime_metrics(10, 4.0, 30.0);
    collector.update_realtime_metrics(3, 1.5, 12.0);

    let realtime = collector.current_metrics().realtime;
    assert_eq!(realtime.active_connections, 3);
    assert_eq!(realtime.messages_per_second, 1.5);
    assert_eq!(realtime.avg_latency_ms, 12.0);
}

#[test]
fn test_history_keeps_most_recent_samples() {
    let collector = MetricsCollector::with_settings(DEFAULT_ALPHA, DEFAULT_HISTORY_CAPACITY);
    for i in 0..150 {
        collector.record_system_sample(reading(i as f64));
    }

    let cpu = collector.cpu_history();
    assert_eq!(cpu.len(), 100);
    let values: Vec<f64> = cpu.iter().map(|p| p.value).collect();
    let expected: Vec<f64> = (50..150).map(|i| i as f64).collect();
    assert_eq!(values, expected);

    assert_eq!(collector.memory_history().len(), 100);
    assert_eq!(collector.samples_collected(), 150);
    assert_eq!(collector.current_metrics().system.cpu_percent, 149.0);
}

#[test]
fn test_purge_history() {
    let collector = MetricsCollector::with_settings(DEFAULT_ALPHA, DEFAULT_HISTORY_CAPACITY);
    let now = Utc::now();
    collector.record_system_sample_at(reading(10.0), now - ChronoDuration::hours(25));
    collector.record_system_sample_at(reading(20.0), now - ChronoDuration::hours(23));
    collector.record_system_sample_at(reading(30.0), now);

    let removed = collector.purge_history_older_than(now - ChronoDuration::hours(24));

    assert_eq!(removed, 2);
    let cpu: Vec<f64> = collector.cpu_history().iter().map(|p| p.value).collect();
    assert_eq!(cpu, vec![20.0, 30.0]);
}

#[test]
fn test_reset() {
    let collector = MetricsCollector::with_settings(DEFAULT_ALPHA, 10);
    collector.track_request(100.0, true);
    collector.record_system_sample(reading(50.0));

    collector.reset();

    let snapshot = collector.current_metrics();
    assert_eq!(snapshot.requests.total_requests, 0);
    assert_eq!(snapshot.requests.avg_response_time_ms, 0.0);
    assert!(collector.cpu_history().is_empty());
    assert_eq!(collector.history_capacity(), 10);
}

#[test]
fn test_concurrent_tracking_loses_nothing() {
    let collector = Arc::new(MetricsCollector::with_settings(
        DEFAULT_ALPHA,
        DEFAULT_HISTORY_CAPACITY,
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let collector = collector.clone();
            std::thread::spawn(move || {
                for i in 0..1000 {
                    collector.track_request(10.0, i % 4 == 0);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let requests = collector.current_metrics().requests;
    assert_eq!(requests.total_requests, 8000);
    assert_eq!(requests.error_count, 2000);
}

#[tokio::test]
async fn test_static_probe() {
    let probe = StaticSystemProbe::new(reading(42.0));
    assert_eq!(probe.sample().await.cpu_percent, 42.0);

    probe.set(reading(7.0));
    assert_eq!(probe.sample().await.cpu_percent, 7.0);
}

#[tokio::test]
async fn test_host_probe_reads_something() {
    let probe = HostSystemProbe::new(std::time::Duration::from_millis(10));
    let sample = probe.sample().await;
    assert!(sample.cpu_percent >= 0.0);
    assert!(sample.memory_percent >= 0.0 && sample.memory_percent <= 100.0);
}
