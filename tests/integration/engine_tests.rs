//! Engine integration tests
//!
//! Ingestion through the worker pool, statistics, topology, risks and trends.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::assertions::{StatisticsAssertions, assert_risk};
    use crate::common::fixtures::{DependencyFactory, GB, MeasurementFactory, TestEngine};
    use depscope::core::models::{DependencyLink, RiskType, Severity, TrendDirection};
    use std::collections::BTreeSet;

    // ==================== Statistics ====================

    #[test]
    fn test_qps_within_one_second() {
        let engine = TestEngine::new();
        for i in 0..100 {
            engine.ingest(MeasurementFactory::ok("GET /burst", 5, 5_000 + i * 9));
        }
        engine.drain();

        let stats = engine.get_statistics("GET /burst").unwrap();
        assert_approx_eq!(stats.qps, 100.0);
        stats.assert_consistent();
    }

    #[test]
    fn test_qps_over_ten_seconds() {
        let engine = TestEngine::new();
        for i in 0..100 {
            engine.ingest(MeasurementFactory::ok("GET /steady", 5, i * 10_000 / 99));
        }
        engine.drain();

        let stats = engine.get_statistics("GET /steady").unwrap();
        assert_approx_eq!(stats.qps, 10.0);
    }

    #[test]
    fn test_percentiles_nearest_rank() {
        let engine = TestEngine::new();
        for (i, ms) in (1..=10).map(|i| i * 10).enumerate() {
            engine.ingest(MeasurementFactory::ok("GET /p", ms, i as i64));
        }
        engine.drain();

        let stats = engine.get_statistics("GET /p").unwrap();
        assert_approx_eq!(stats.p95_ms, 100.0);
        assert_approx_eq!(stats.p99_ms, 100.0);
        assert_approx_eq!(stats.avg_response_time_ms, 55.0);
    }

    #[test]
    fn test_error_accounting() {
        let engine = TestEngine::new();
        for i in 0..30 {
            let m = match i % 3 {
                0 => MeasurementFactory::create("POST /pay", 20, 404, i),
                1 => MeasurementFactory::error("POST /pay", 20, i),
                _ => MeasurementFactory::ok("POST /pay", 20, i),
            };
            engine.ingest(m);
        }
        engine.drain();

        let stats = engine.get_statistics("POST /pay").unwrap();
        stats.assert_consistent();
        assert_eq!(stats.error_count, 20);
        assert_eq!(stats.error_status_distribution.get(&404), Some(&10));
        assert_eq!(stats.error_status_distribution.get(&500), Some(&10));
        assert_eq!(engine.get_error_details("POST /pay").len(), 20);
    }

    #[test]
    fn test_refresh_matches_live_statistics() {
        let engine = TestEngine::new();
        for i in 0..50 {
            engine.ingest(MeasurementFactory::ok("GET /r", (i % 7 + 1) as u64, i * 20));
        }
        engine.drain();

        let live = engine.get_statistics("GET /r").unwrap();
        engine.refresh_all_statistics();
        let refreshed = engine.get_statistics("GET /r").unwrap();
        assert_eq!(live.total_requests, refreshed.total_requests);
        assert_approx_eq!(live.avg_response_time_ms, refreshed.avg_response_time_ms);
        assert_approx_eq!(live.p95_ms, refreshed.p95_ms);
    }

    // ==================== Topology & risks ====================

    #[test]
    fn test_cycle_scenario() {
        let engine = TestEngine::new();
        engine.register_dependency(DependencyFactory::database("DB1")).unwrap();
        engine.register_dependency(DependencyFactory::database("DB2")).unwrap();

        assert!(engine.build_topology().cyclic_nodes().is_empty());

        engine.register_link(DependencyLink::new("DB1", "DB2")).unwrap();
        engine.register_link(DependencyLink::new("DB2", "DB1")).unwrap();

        let topology = engine.build_topology();
        let expected: BTreeSet<String> = ["DB1", "DB2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(topology.cyclic_nodes(), &expected);
        assert!(topology.to_dot().contains("lightcoral"));

        let risks = engine.analyze_risks();
        assert_risk(&risks, RiskType::CircularDependency, "DB1, DB2", Severity::High);
    }

    #[test]
    fn test_excessive_dependency_scenario() {
        let engine = TestEngine::new();
        for (i, calls) in [10, 10, 10, 10, 1000].iter().enumerate() {
            engine
                .register_dependency(DependencyFactory::with_calls(&format!("svc{}", i), *calls))
                .unwrap();
        }
        assert!(
            engine
                .analyze_risks()
                .iter()
                .all(|r| r.risk_type != RiskType::ExcessiveDependency)
        );

        // enough quiet peers push the outlier past mean + 3 sigma
        for i in 5..30 {
            engine
                .register_dependency(DependencyFactory::with_calls(&format!("svc{}", i), 10))
                .unwrap();
        }
        engine
            .register_dependency(DependencyFactory::with_calls("svc4", 5000))
            .unwrap();
        assert_risk(
            &engine.analyze_risks(),
            RiskType::ExcessiveDependency,
            "svc4",
            Severity::Medium,
        );
    }

    #[test]
    fn test_single_point_of_failure_and_slow_endpoint() {
        let engine = TestEngine::new();
        engine.register_dependency(DependencyFactory::critical("ledger")).unwrap();
        engine
            .register_dependency(DependencyFactory::critical("replicated").with_redundancy(true))
            .unwrap();
        for i in 0..5 {
            engine.ingest(MeasurementFactory::ok("GET /report", 2_200, i * 100));
        }
        engine.drain();

        let risks = engine.analyze_risks();
        assert_risk(&risks, RiskType::SinglePointOfFailure, "ledger", Severity::High);
        assert_risk(&risks, RiskType::PerformanceBottleneck, "GET /report", Severity::Medium);
        assert!(risks.iter().all(|r| r.component != "replicated"));
    }

    // ==================== Trends ====================

    #[test]
    fn test_rising_trend_scenario() {
        let engine = TestEngine::new();
        for m in MeasurementFactory::linear("GET /t", 20, 100.0, 200.0) {
            engine.ingest(m);
        }
        engine.drain();

        let trend = engine.analyze_trend("GET /t");
        assert_eq!(trend.direction, TrendDirection::Rising);
        assert!(trend.change_rate > 0.01);
        assert!(trend.degrading);

        let all = engine.analyze_all_trends();
        assert_eq!(all.get("GET /t"), Some(&trend));
    }

    // ==================== Resource guard ====================

    #[test]
    fn test_guard_scenario() {
        let engine = TestEngine::new();
        engine.probe.set_used(GB / 100 * 96);
        engine.can_collect_metric();
        let status = engine.memory_status();
        assert!(status.degraded);
        assert_approx_eq!(status.current_sampling_rate, 0.05);

        engine.probe.set_used(GB / 2);
        assert!(engine.can_collect_metric());
        let status = engine.memory_status();
        assert!(!status.degraded);
        assert_approx_eq!(status.current_sampling_rate, 1.0);
    }

    #[test]
    fn test_report_serializes() {
        let engine = TestEngine::new();
        engine.register_dependency(DependencyFactory::critical("db")).unwrap();
        engine.ingest(MeasurementFactory::ok("GET /", 1, 0));
        engine.drain();

        let report = engine.generate_report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["total_dependencies"], 1);
        assert_eq!(json["risks"][0]["type"], "SINGLE_POINT_OF_FAILURE");
        assert_eq!(json["topology"]["nodes"].as_array().unwrap().len(), 2);
    }
}
