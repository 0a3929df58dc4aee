mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;
    use kvload::export::{export_csv_file, CSV_HEADER};
    use kvload::prelude::*;
    use mock_store::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn base() -> RunConfig {
        RunConfig::new()
            .operations_per_worker(200)
            .warmup_operations(10)
            .key_range(0, 999)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sweep_then_export() {
        init();

        let store = Arc::new(MockStore::new(0..=999));
        let ramp = RampConfig::new(10, 3).settle_pause(Duration::from_millis(20));

        let series = RampTest::new(store, base(), ramp).run().await.unwrap();

        let workers: Vec<_> = series.iter().map(|s| s.workers).collect();
        assert_eq!(workers, vec![1, 4, 7, 10]);
        for stats in &series {
            assert_eq!(stats.total_operations, stats.workers as u64 * 200);
            assert_eq!(stats.success_rate, 1.);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rampup_results.csv");
        export_csv_file(&path, &series).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));

        let rows: Vec<Vec<&str>> = lines.map(|line| line.split(',').collect()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3][0], "10");
        assert_eq!(rows[3][8], "100.00");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn export_failure_keeps_series() {
        init();

        let store = Arc::new(MockStore::new(0..=999));
        let ramp = RampConfig::new(2, 1).settle_pause(Duration::from_millis(10));
        let series = RampTest::new(store, base(), ramp).run().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let res = export_csv_file(dir.path().join("missing/out.csv"), &series);

        assert!(matches!(res, Err(ExportError::Io(_))));
        assert_eq!(series.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[ntest::timeout(10_000)]
    async fn interrupt_returns_completed_steps() {
        init();

        let store = Arc::new(MockStore::new(0..=999));
        let ramp = RampConfig::new(5, 1).settle_pause(Duration::from_secs(30));

        let err = RampTest::new(store, base(), ramp)
            .run_until(tokio::time::sleep(Duration::from_millis(300)))
            .await
            .unwrap_err();

        match err {
            RunError::Interrupted { completed } => {
                assert_eq!(completed.len(), 1);
                assert_eq!(completed[0].total_operations, 200);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
