//! Retention and disk overflow integration tests

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{MeasurementFactory, TestEngine};
    use chrono::{Days, Local};
    use depscope::storage::metrics::file_name_for;
    use std::fs;

    #[test]
    fn test_overflow_then_reload() {
        let engine = TestEngine::with_config(|c| {
            c.storage.max_cached_metrics_per_endpoint = 10;
        });
        for i in 0..11 {
            engine.ingest(MeasurementFactory::ok("GET /items", 3, i));
        }
        engine.drain();

        let store = engine.store();
        assert_eq!(store.memory_cache_size("GET /items"), 0);
        let reloaded = store.load_from_disk("GET /items");
        assert_eq!(reloaded.len(), 11);

        let file = engine
            .dir
            .path()
            .join(file_name_for("GET /items", Local::now().date_naive()));
        assert!(file.exists());
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(file).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 11);
    }

    #[test]
    fn test_corrupt_day_file_keeps_cache_bounded() {
        let engine = TestEngine::with_config(|c| {
            c.storage.max_cached_metrics_per_endpoint = 10;
        });
        let file = engine
            .dir
            .path()
            .join(file_name_for("a", Local::now().date_naive()));
        fs::write(&file, "{not json").unwrap();

        for i in 0..1000 {
            engine.ingest(MeasurementFactory::ok("a", 1, i));
        }
        engine.drain();

        let store = engine.store();
        assert!(store.memory_cache_size("a") <= 10);
        assert_eq!(
            store.load_from_disk("a").len() + store.memory_cache_size("a"),
            1000
        );
        assert!(file.with_extension("json.corrupt").exists());
    }

    #[test]
    fn test_cleanup_old_data() {
        let engine = TestEngine::with_config(|c| {
            c.storage.data_retention_days = 3;
        });
        let today = Local::now().date_naive();
        let dir = engine.dir.path();

        let old = dir.join(file_name_for("GET /a", today.checked_sub_days(Days::new(5)).unwrap()));
        let kept = dir.join(file_name_for("GET /a", today.checked_sub_days(Days::new(2)).unwrap()));
        let unparseable = dir.join("metrics-GET__a-yesterday.json");
        for path in [&old, &kept, &unparseable] {
            fs::write(path, "[]").unwrap();
        }

        assert_eq!(engine.cleanup_old_data(), 1);
        assert!(!old.exists());
        assert!(kept.exists());
        assert!(unparseable.exists());
    }

    #[test]
    fn test_shutdown_flushes_everything() {
        let engine = TestEngine::new();
        for i in 0..3 {
            engine.ingest(MeasurementFactory::ok("GET /a", 1, i));
            engine.ingest(MeasurementFactory::ok("GET /b", 1, i));
        }
        engine.shutdown();

        let store = engine.store();
        assert_eq!(store.load_from_disk("GET /a").len(), 3);
        assert_eq!(store.load_from_disk("GET /b").len(), 3);
        assert!(store.get_metrics("GET /a").is_empty());
    }
}
