//! Monitoring and alerting integration tests
//!
//! Exercise the performance monitor together with the real snapshot cache,
//! realtime hub and job queue.

#[cfg(test)]
mod tests {
    use crate::common::snapshot_with;
    use formula_core::ManagedService;
    use formula_core::config::{JobsConfig, MonitoringConfig, RealtimeConfig};
    use formula_core::monitoring::alerts::{
        AlertManager, AlertSeverity, CPU_CRITICAL, ERROR_RATE_HIGH, MEMORY_HIGH, PERFORMANCE_ALERT,
        builtin_rules,
    };
    use formula_core::monitoring::metrics::{MetricsCollector, StaticSystemProbe};
    use formula_core::monitoring::{HISTORY_KEY, PerformanceMonitor, SNAPSHOT_KEY, SystemMetrics};
    use formula_core::services::{
        Job, JobHandler, JobQueue, NOTIFICATIONS_QUEUE, RealtimeHub, SnapshotCache,
    };
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_moving_average_sequence() {
        let collector = MetricsCollector::with_settings(0.1, 100);
        let mut expected = [10.0, 29.0, 36.1].into_iter();

        for ms in [100.0, 200.0, 100.0] {
            collector.track_request(ms, false);
            let avg = collector.current_metrics().requests.avg_response_time_ms;
            assert!((avg - expected.next().unwrap()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_history_keeps_latest_hundred() {
        let collector = MetricsCollector::with_settings(0.1, 100);
        let start = Utc::now();

        for i in 0..150 {
            collector.record_system_sample_at(
                SystemMetrics {
                    cpu_percent: i as f64,
                    ..SystemMetrics::default()
                },
                start + ChronoDuration::seconds(i),
            );
        }

        let cpu = collector.cpu_history();
        assert_eq!(cpu.len(), 100);
        let values: Vec<f64> = cpu.iter().map(|p| p.value).collect();
        let expected: Vec<f64> = (50..150).map(|i| i as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_alert_lifecycle_with_cooldown() {
        let alerts = AlertManager::new(Duration::from_secs(300));
        alerts.add_rules(builtin_rules(&MonitoringConfig::default().thresholds));
        let start = Utc::now();

        for tick in 0..3 {
            alerts.evaluate_at(
                &snapshot_with(90.0, 40.0, 50.0, 0.0),
                start + ChronoDuration::seconds(30 * tick),
            );
        }
        let raised = alerts
            .history(None)
            .iter()
            .filter(|a| a.rule_id == CPU_CRITICAL)
            .count();
        assert_eq!(raised, 1);

        alerts.evaluate_at(
            &snapshot_with(10.0, 40.0, 50.0, 0.0),
            start + ChronoDuration::seconds(120),
        );
        assert!(alerts.active_alerts().is_empty());
    }

    #[test]
    fn test_memory_and_error_rate_rules() {
        let alerts = AlertManager::default();
        alerts.add_rules(builtin_rules(&MonitoringConfig::default().thresholds));

        let raised = alerts.evaluate(&snapshot_with(10.0, 80.0, 50.0, 7.5));

        let mut ids: Vec<&str> = raised.iter().map(|a| a.rule_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![ERROR_RATE_HIGH, MEMORY_HIGH]);
        let error_rate = raised.iter().find(|a| a.rule_id == ERROR_RATE_HIGH).unwrap();
        assert_eq!(error_rate.severity, AlertSeverity::Critical);
    }

    #[derive(Default)]
    struct Inbox {
        jobs: Mutex<Vec<Job>>,
    }

    #[async_trait]
    impl JobHandler for Inbox {
        async fn handle(&self, job: &Job) -> formula_core::Result<()> {
            self.jobs.lock().push(job.clone());
            Ok(())
        }
    }

    /// A critical alert reaches realtime subscribers and the job queue, and
    /// the aggregated snapshot lands in the cache
    #[tokio::test]
    async fn test_monitor_with_real_services() {
        let cache = Arc::new(SnapshotCache::default());
        let realtime = Arc::new(RealtimeHub::new(&RealtimeConfig::default()));
        let jobs = Arc::new(JobQueue::new(&JobsConfig::default()));
        let inbox = Arc::new(Inbox::default());
        jobs.register_handler(NOTIFICATIONS_QUEUE, inbox.clone());

        let probe = Arc::new(StaticSystemProbe::new(SystemMetrics {
            cpu_percent: 92.0,
            memory_percent: 30.0,
            ..SystemMetrics::default()
        }));
        let monitor = PerformanceMonitor::builder(MonitoringConfig::default())
            .probe(probe.clone())
            .store(cache.clone())
            .realtime(realtime.clone())
            .build();
        monitor.alerts().add_notifier(realtime.clone());
        monitor.alerts().add_notifier(jobs.clone());

        cache.initialize().await.unwrap();
        realtime.initialize().await.unwrap();
        jobs.initialize().await.unwrap();
        monitor.initialize().await.unwrap();

        let mut subscriber = realtime.subscribe();
        monitor.track_request(120.0, false);
        monitor.collect_once().await;

        let notification = subscriber.recv().await.unwrap();
        assert_eq!(notification.kind, PERFORMANCE_ALERT);
        assert_eq!(notification.severity, Some(AlertSeverity::Critical));
        assert_eq!(monitor.current_metrics().realtime.active_connections, 1);

        monitor.aggregate_once().await;
        let cached = cache.get(SNAPSHOT_KEY).unwrap();
        assert_eq!(cached["requests"]["total_requests"], 1);
        assert_eq!(cached["system"]["cpu_percent"], 92.0);
        assert!(cache.get(HISTORY_KEY).is_some());

        monitor.shutdown().await.unwrap();
        jobs.shutdown().await.unwrap();
        let delivered = inbox.jobs.lock();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].payload["data"]["rule_id"], CPU_CRITICAL);
    }

    #[tokio::test]
    async fn test_retention_drops_day_old_data() {
        let monitor = PerformanceMonitor::builder(MonitoringConfig::default())
            .probe(Arc::new(StaticSystemProbe::default()))
            .build();
        monitor.initialize().await.unwrap();

        let old = Utc::now() - ChronoDuration::hours(25);
        monitor.alerts().evaluate_at(&snapshot_with(95.0, 10.0, 0.0, 0.0), old);
        monitor
            .alerts()
            .evaluate_at(&snapshot_with(5.0, 10.0, 0.0, 0.0), old + ChronoDuration::minutes(1));
        monitor.collector().record_system_sample_at(SystemMetrics::default(), old);
        assert_eq!(monitor.alerts().history(None).len(), 2);

        monitor.retain_once();

        assert!(monitor.alerts().history(None).is_empty());
        assert!(monitor.performance_trends().cpu.is_empty());
        monitor.shutdown().await.unwrap();
    }
}
