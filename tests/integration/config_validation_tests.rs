//! Configuration validation integration tests
//!
//! Loading, defaults and validation of every config section.

#[cfg(test)]
mod tests {
    use crate::{assert_err, assert_ok};
    use depscope::config::{
        AnalysisConfig, ExecutorConfig, GuardConfig, SchedulerConfig, StorageConfig, Validate,
    };
    use depscope::{Config, DiagnosticsError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==================== Defaults ====================

    #[test]
    fn test_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.slow_endpoint_threshold_ms, 1000);
        assert_eq!(config.analysis.high_error_rate_threshold, 0.05);
        assert_eq!(config.analysis.min_trend_data_points, 10);
        assert_eq!(config.storage.data_retention_days, 7);
        assert_eq!(config.storage.max_cached_metrics_per_endpoint, 10_000);
        assert_eq!(config.guard.max_memory_usage_threshold, 0.9);
        assert_eq!(config.executor.worker_threads, 4);
        assert_eq!(config.executor.queue_capacity, 100);
        assert!(config.scheduler.report_interval_secs.is_none());
        assert!(config.validate().is_ok());
    }

    // ==================== Loading ====================

    #[test]
    fn test_partial_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "analysis:\n  slow_endpoint_threshold_ms: 250\nstorage:\n  data_retention_days: 30\n"
        )
        .unwrap();

        let config = assert_ok!(Config::from_file(file.path()));
        assert_eq!(config.analysis.slow_endpoint_threshold_ms, 250);
        assert_eq!(config.storage.data_retention_days, 30);
        // untouched sections keep their defaults
        assert_eq!(config.executor, ExecutorConfig::default());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = assert_err!(Config::from_file("/definitely/not/here.yaml"));
        assert!(matches!(err, DiagnosticsError::Config(_)));
    }

    #[test]
    fn test_invalid_yaml_values_rejected() {
        let err = assert_err!(Config::from_yaml("guard:\n  max_memory_usage_threshold: 1.5\n"));
        assert!(err.to_string().contains("Memory usage threshold"));
    }

    #[test]
    fn test_yaml_round_trip_through_export() {
        let mut config = Config::default();
        config.scheduler.report_interval_secs = Some(300);
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
        assert!(config.to_json().unwrap().contains("\"report_interval_secs\": 300"));
    }

    // ==================== Section validation ====================

    #[test]
    fn test_ratio_bounds() {
        let mut analysis = AnalysisConfig::default();
        analysis.high_error_rate_threshold = 0.0;
        assert!(analysis.validate().is_err());
        analysis.high_error_rate_threshold = 1.0;
        assert!(analysis.validate().is_ok());

        let guard = GuardConfig {
            max_memory_usage_threshold: f64::NAN,
            ..GuardConfig::default()
        };
        assert!(guard.validate().is_err());
    }

    #[test]
    fn test_minimums() {
        let storage = StorageConfig {
            data_retention_days: 0,
            ..StorageConfig::default()
        };
        assert!(storage.validate().unwrap_err().contains("retention"));

        let executor = ExecutorConfig {
            worker_threads: 0,
            ..ExecutorConfig::default()
        };
        assert!(executor.validate().is_err());

        let scheduler = SchedulerConfig {
            report_interval_secs: Some(0),
            ..SchedulerConfig::default()
        };
        assert!(scheduler.validate().is_err());
    }

    #[test]
    fn test_config_error_names_section() {
        let mut config = Config::default();
        config.storage.max_cached_metrics_per_endpoint = 0;
        let err = assert_err!(config.validate());
        assert!(matches!(err, DiagnosticsError::Config(_)));
        assert!(err.to_string().contains("Storage config error"));
    }
}
