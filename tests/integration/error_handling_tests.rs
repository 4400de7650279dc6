//! Error handling integration tests
//!
//! Invalid input is dropped, failures stay contained and queries never fail for
//! missing data.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{MeasurementFactory, TestEngine};
    use depscope::core::models::{
        DependencyLink, DependencyType, ExternalDependency, RequestMeasurement, TrendDirection,
    };
    use depscope::utils::error::{DiagnosticsError, ErrorCategory, isolate};
    use depscope::{Config, DiagnosticsEngine};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_blank_endpoint_rejected_at_construction() {
        let err = RequestMeasurement::new("  ", 1, 200, 0, "GET").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Ingestion);
    }

    #[test]
    fn test_invalid_replayed_measurement_is_dropped() {
        let engine = TestEngine::new();
        // deserialization skips constructor validation
        let bad: RequestMeasurement = serde_json::from_str(
            r#"{"endpoint_id":"","duration_nanos":1,"status_code":200,"timestamp_millis":0,"http_method":"GET"}"#,
        )
        .unwrap();
        engine.ingest(bad);
        engine.ingest(MeasurementFactory::ok("GET /fine", 1, 0));
        engine.drain();

        assert_eq!(engine.get_all_statistics().len(), 1);
        assert_eq!(engine.pool_stats().submitted, 1);
    }

    #[test]
    fn test_storage_directory_failure_escalates() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let mut config = Config::default();
        config.storage.data_dir = blocker.join("nested").to_string_lossy().into_owned();
        let err = DiagnosticsEngine::new(config).unwrap_err();
        assert!(matches!(err, DiagnosticsError::Config(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_registry_rejects_blank_ids() {
        let engine = TestEngine::new();
        assert!(
            engine
                .register_dependency(ExternalDependency::new("", DependencyType::Cache))
                .is_err()
        );
        assert!(engine.register_link(DependencyLink::new("a", " ")).is_err());
    }

    #[test]
    fn test_links_to_unknown_nodes_are_ignored() {
        let engine = TestEngine::new();
        engine
            .register_dependency(ExternalDependency::new("db", DependencyType::Database))
            .unwrap();
        engine.register_link(DependencyLink::new("db", "ghost")).unwrap();

        let topology = engine.build_topology();
        assert_eq!(topology.graph().node_count(), 2);
        assert_eq!(topology.graph().edge_count(), 1);
    }

    #[test]
    fn test_no_data_queries_return_defaults() {
        let engine = TestEngine::new();
        assert!(engine.get_statistics("nope").is_none());
        assert!(engine.get_error_details("nope").is_empty());
        assert!(engine.get_time_series_data("nope", Some((0, 10))).is_empty());
        assert_eq!(engine.analyze_trend("nope").direction, TrendDirection::Stable);
        engine.refresh_statistics("nope");
        assert!(engine.get_statistics("nope").is_none());
    }

    #[test]
    fn test_isolate_contains_panics() {
        let result: depscope::Result<()> = isolate("exploding unit", || panic!("boom"));
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.to_string().contains("boom"));
    }
}
