//! Composition root integration tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use formula_core::Config;
    use formula_core::bootstrap::HealthState;
    use formula_core::server::Runtime;
    use formula_core::server::builder::{
        CACHE_SERVICE, JOBS_SERVICE, PERFORMANCE_SERVICE, REALTIME_SERVICE,
    };

    #[tokio::test]
    async fn test_full_runtime_lifecycle() {
        let runtime = assert_ok!(Runtime::build(&Config::default()));

        let report = assert_ok!(runtime.registry.initialize_all().await);
        assert!(report.initialized);
        assert_eq!(
            report.processed,
            vec![CACHE_SERVICE, REALTIME_SERVICE, JOBS_SERVICE, PERFORMANCE_SERVICE]
        );

        let health = runtime.registry.perform_health_check().await;
        assert_eq!(health.status, HealthState::Healthy);
        assert_eq!(health.healthy_services, 4);

        let monitor = runtime.monitor.clone().unwrap();
        monitor.track_request(40.0, false);
        monitor.track_database_query(12.0, false);
        let metrics = monitor.current_metrics();
        assert_eq!(metrics.requests.total_requests, 1);
        assert_eq!(metrics.database.query_count, 1);

        let shutdown = runtime.registry.shutdown().await;
        assert_eq!(shutdown.stopped.first().map(String::as_str), Some(PERFORMANCE_SERVICE));
        assert_eq!(shutdown.stopped.last().map(String::as_str), Some(CACHE_SERVICE));
        assert!(shutdown.failures.is_empty());
    }
}
