//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use formula_core::{Config, FormulaError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_empty_file_gives_defaults() {
        let file = write_config("");

        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.server().port, 5014);
        assert_eq!(config.bootstrap().service_timeout_secs, 30);
        assert_eq!(config.bootstrap().overall_timeout_secs, 60);
        assert_eq!(config.monitoring().ema_alpha, 0.1);
        assert_eq!(config.monitoring().history_capacity, 100);
        assert_eq!(config.monitoring().alert_cooldown_secs, 300);
        assert_eq!(config.monitoring().thresholds.cpu_critical, 85.0);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
bootstrap:
  service_timeout_secs: 20
monitoring:
  thresholds:
    cpu_warning: 60
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.bootstrap().service_timeout_secs, 20);
        assert_eq!(config.bootstrap().slow_service_warning_secs, 10);
        assert_eq!(config.monitoring().thresholds.cpu_warning, 60.0);
        assert_eq!(config.monitoring().thresholds.cpu_critical, 85.0);
    }

    #[tokio::test]
    async fn test_invalid_alpha_rejected() {
        let file = write_config("monitoring:\n  ema_alpha: 1.5\n");

        let err = assert_err!(Config::from_file(file.path()).await);
        assert!(matches!(err, FormulaError::Config(ref msg) if msg.contains("Monitoring")));
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let file = write_config("bootstrap:\n  service_timeout_secs: 0\n");

        let err = assert_err!(Config::from_file(file.path()).await);
        assert!(matches!(err, FormulaError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = assert_err!(Config::from_file("/nonexistent/formula.yaml").await);
        assert!(matches!(err, FormulaError::Config(_)));
    }
}
