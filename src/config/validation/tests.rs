//! Configuration validation tests

use super::Validate;
use crate::config::models::*;

#[test]
fn test_defaults_are_valid() {
    assert!(ServerConfig::default().validate().is_ok());
    assert!(BootstrapConfig::default().validate().is_ok());
    assert!(MonitoringConfig::default().validate().is_ok());
    assert!(LoggingConfig::default().validate().is_ok());
    assert!(RealtimeConfig::default().validate().is_ok());
    assert!(JobsConfig::default().validate().is_ok());
}

#[test]
fn test_zero_service_timeout_rejected() {
    let config = BootstrapConfig {
        service_timeout_secs: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_slow_warning_must_be_below_timeout() {
    let config = BootstrapConfig {
        service_timeout_secs: 10,
        slow_service_warning_secs: 10,
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.contains("Slow service warning"));
}

#[test]
fn test_overall_timeout_must_cover_service_timeout() {
    let config = BootstrapConfig {
        service_timeout_secs: 30,
        overall_timeout_secs: 20,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_ema_alpha_bounds() {
    for alpha in [0.0, -0.5, 1.5, f64::NAN] {
        let config = MonitoringConfig {
            ema_alpha: alpha,
            ..Default::default()
        };
        assert!(config.validate().is_err(), "alpha {} accepted", alpha);
    }

    let config = MonitoringConfig {
        ema_alpha: 1.0,
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_history_capacity_rejected() {
    let config = MonitoringConfig {
        history_capacity: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_threshold_ordering() {
    let thresholds = AlertThresholds {
        cpu_warning: 90.0,
        cpu_critical: 80.0,
        ..Default::default()
    };
    assert!(thresholds.validate().is_err());

    let thresholds = AlertThresholds {
        memory_warning: 95.0,
        ..Default::default()
    };
    assert!(thresholds.validate().is_err());
}

#[test]
fn test_log_level_validation() {
    let config = LoggingConfig {
        level: "verbose".to_string(),
        json: false,
    };
    assert!(config.validate().is_err());

    let config = LoggingConfig {
        level: "info,actix_web=warn".to_string(),
        json: true,
    };
    assert!(config.validate().is_ok());
}
