//! Bootstrap integration tests
//!
//! Drive full initialization walks through the public registry API.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedService, Step, event_log, position};
    use crate::{assert_err, assert_ok};
    use formula_core::bootstrap::{Criticality, HealthState, ServiceRegistry};
    use formula_core::config::BootstrapConfig;
    use formula_core::{BootstrapError, FormulaError};
    use std::time::Duration;

    fn registry() -> ServiceRegistry {
        ServiceRegistry::new(BootstrapConfig::default())
    }

    /// Every dependency finishes initializing before its dependent starts
    #[tokio::test]
    async fn test_dependencies_complete_before_dependents() {
        let log = event_log();
        let registry = registry();

        // Registered out of dependency order on purpose
        registry
            .register(
                "performance",
                ScriptedService::new("performance", Step::Succeed, &log),
                &["cache", "realtime", "jobs"],
                Criticality::Optional,
            )
            .unwrap();
        registry
            .register(
                "jobs",
                ScriptedService::new("jobs", Step::Succeed, &log),
                &["cache"],
                Criticality::Optional,
            )
            .unwrap();
        registry
            .register(
                "realtime",
                ScriptedService::new("realtime", Step::Succeed, &log),
                &[],
                Criticality::Optional,
            )
            .unwrap();
        registry
            .register(
                "cache",
                ScriptedService::new("cache", Step::Succeed, &log),
                &[],
                Criticality::Critical,
            )
            .unwrap();

        let report = assert_ok!(registry.initialize_all().await);
        assert!(report.initialized);

        for (dependent, dependencies) in [
            ("performance", vec!["cache", "realtime", "jobs"]),
            ("jobs", vec!["cache"]),
        ] {
            let started = position(&log, &format!("init:{}", dependent)).unwrap();
            for dependency in dependencies {
                let ready = position(&log, &format!("ready:{}", dependency)).unwrap();
                assert!(ready < started, "{} started before {} was ready", dependent, dependency);
            }
        }
    }

    #[tokio::test]
    async fn test_second_initialization_is_a_noop() {
        let log = event_log();
        let registry = registry();
        let cache = ScriptedService::new("cache", Step::Succeed, &log);
        registry
            .register("cache", cache.clone(), &[], Criticality::Critical)
            .unwrap();

        assert_ok!(registry.initialize_all().await);
        assert_ok!(registry.initialize_all().await);

        assert_eq!(cache.init_calls(), 1);
    }

    /// Optional B fails, critical C depending on B still starts
    #[tokio::test]
    async fn test_optional_failure_scenario() {
        let log = event_log();
        let registry = registry();
        registry
            .register("A", ScriptedService::new("A", Step::Succeed, &log), &[], Criticality::Critical)
            .unwrap();
        registry
            .register(
                "B",
                ScriptedService::new("B", Step::Fail("boom"), &log),
                &["A"],
                Criticality::Optional,
            )
            .unwrap();
        registry
            .register("C", ScriptedService::new("C", Step::Succeed, &log), &["B"], Criticality::Critical)
            .unwrap();

        let report = assert_ok!(registry.initialize_all().await);

        assert_eq!(registry.failed_services(), vec!["B"]);
        assert_eq!(report.processed, vec!["A", "B", "C"]);
        assert!(position(&log, "init:B").unwrap() < position(&log, "init:C").unwrap());
        assert!(report.failed[0].reason.contains("boom"));
    }

    #[tokio::test]
    async fn test_critical_failure_scenario() {
        let log = event_log();
        let registry = registry();
        registry
            .register("X", ScriptedService::new("X", Step::Fail("no database"), &log), &[], Criticality::Critical)
            .unwrap();
        let after = ScriptedService::new("Y", Step::Succeed, &log);
        registry
            .register("Y", after.clone(), &[], Criticality::Optional)
            .unwrap();

        let err = assert_err!(registry.initialize_all().await);

        assert!(matches!(
            err,
            FormulaError::Bootstrap(BootstrapError::CriticalServiceFailure { ref service, .. })
                if service == "X"
        ));
        assert_eq!(after.init_calls(), 0);
        assert!(!registry.is_initialized());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_service_times_out_within_service_budget() {
        let log = event_log();
        let registry = registry();
        registry
            .register("stuck", ScriptedService::new("stuck", Step::Hang, &log), &[], Criticality::Critical)
            .unwrap();

        let started = tokio::time::Instant::now();
        let err = assert_err!(registry.initialize_all().await);
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(30));
        assert!(elapsed < Duration::from_secs(60));
        match err {
            FormulaError::Bootstrap(BootstrapError::CriticalServiceFailure { service, reason }) => {
                assert_eq!(service, "stuck");
                assert!(reason.contains("30s"), "unexpected reason: {}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_walk_budget_covers_every_service() {
        let log = event_log();
        let registry = registry();
        for name in ["a", "b", "c"] {
            registry
                .register(
                    name,
                    ScriptedService::new(name, Step::Sleep(Duration::from_secs(25)), &log),
                    &[],
                    Criticality::Optional,
                )
                .unwrap();
        }

        let err = assert_err!(registry.initialize_all().await);
        assert!(matches!(
            err,
            FormulaError::Bootstrap(BootstrapError::BootstrapTimeout { .. })
        ));
        assert!(position(&log, "init:c").is_some());
        assert!(position(&log, "ready:c").is_none());
    }

    #[tokio::test]
    async fn test_cycle_starts_nothing() {
        let log = event_log();
        let registry = registry();
        let first = ScriptedService::new("first", Step::Succeed, &log);
        registry
            .register("first", first.clone(), &["second"], Criticality::Critical)
            .unwrap();
        registry
            .register(
                "second",
                ScriptedService::new("second", Step::Succeed, &log),
                &["first"],
                Criticality::Critical,
            )
            .unwrap();

        let err = assert_err!(registry.initialize_all().await);
        assert!(matches!(
            err,
            FormulaError::Bootstrap(BootstrapError::DependencyCycle { .. })
        ));
        assert_eq!(first.init_calls(), 0);
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_health_counts_and_reverse_shutdown() {
        let log = event_log();
        let registry = registry();
        registry
            .register("cache", ScriptedService::new("cache", Step::Succeed, &log), &[], Criticality::Critical)
            .unwrap();
        registry
            .register("queue", ScriptedService::unhealthy("queue", &log), &["cache"], Criticality::Optional)
            .unwrap();
        registry
            .register(
                "mailer",
                ScriptedService::new("mailer", Step::Fail("smtp down"), &log),
                &[],
                Criticality::Optional,
            )
            .unwrap();
        registry
            .register("api", ScriptedService::new("api", Step::Succeed, &log), &["queue"], Criticality::Critical)
            .unwrap();
        assert_ok!(registry.initialize_all().await);

        let health = registry.perform_health_check().await;
        assert_eq!(health.total_services, 4);
        assert_eq!(health.healthy_services, 2);
        assert_eq!(health.unhealthy_services, 2);
        assert_eq!(health.status, HealthState::Degraded);

        let report = registry.shutdown().await;
        assert_eq!(report.stopped, vec!["api", "queue", "cache"]);
        assert!(report.failures.is_empty());

        let again = registry.shutdown().await;
        assert!(again.stopped.is_empty());
    }

    #[tokio::test]
    async fn test_typed_lookup() {
        let log = event_log();
        let registry = registry();
        let handle = registry
            .register("cache", ScriptedService::new("cache", Step::Succeed, &log), &[], Criticality::Critical)
            .unwrap();
        assert_eq!(handle.name(), "cache");

        let found = assert_ok!(registry.get::<ScriptedService>("cache"));
        assert_eq!(found.init_calls(), 0);

        let err = assert_err!(registry.get::<formula_core::services::SnapshotCache>("cache"));
        assert!(matches!(
            err,
            FormulaError::Bootstrap(BootstrapError::TypeMismatch { .. })
        ));
    }
}
