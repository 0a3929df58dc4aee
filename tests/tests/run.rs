mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;
    use kvload::prelude::*;
    use mock_store::prelude::*;
    use std::num::NonZeroU32;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn uniform_operation_cap() {
        init();

        let store = Arc::new(MockStore::new(0..=4_999));
        let config = RunConfig::new()
            .workers(4)
            .operations_per_worker(1_000)
            .warmup_operations(100)
            .key_range(0, 9_999);

        let stats = ReadTest::new(store.clone(), config).run().await.unwrap();

        assert_eq!(stats.total_operations, 4_000);
        assert_eq!(
            stats.successful_operations + stats.failed_operations,
            stats.total_operations
        );
        assert_eq!(store.total_reads(), 4_400);
        // Half of the key range is populated.
        assert!(stats.success_rate > 0.4 && stats.success_rate < 0.6);
        assert!(stats.throughput > 0.);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn hot_spot_concentrates_reads() {
        init();

        let store = Arc::new(MockStore::new(0..=9_999));
        let config = RunConfig::new()
            .workers(4)
            .operations_per_worker(25_000)
            .key_range(0, 9_999)
            .distribution(KeyDistribution::HotSpot)
            .measure_latency(false);

        let stats = ReadTest::new(store.clone(), config).run().await.unwrap();
        assert_eq!(stats.total_operations, 100_000);
        assert_eq!(stats.success_rate, 1.);

        let hot = densest_window(&store.tallies(), 0, 9_999, 2_000);
        let fraction = hot as f64 / 100_000.;
        assert!((fraction - 0.8).abs() < 0.01, "fraction={fraction}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn latency_percentiles_are_ordered() {
        init();

        let store = Arc::new(MockStore::new(0..=999).with_latency(LatencyProfile {
            mean: Duration::from_millis(2),
            std: Duration::from_millis(1),
        }));
        let config = RunConfig::new()
            .workers(8)
            .duration(Duration::from_millis(500))
            .key_range(0, 999);

        let stats = ReadTest::new(store, config).run().await.unwrap();
        let latency = stats.latency;

        assert!(stats.total_operations > 0);
        assert!(latency.p50 >= Duration::from_millis(2));
        assert!(latency.p50 <= latency.p90);
        assert!(latency.p90 <= latency.p95);
        assert!(latency.p95 <= latency.p99);
        assert!(latency.p99 <= latency.max);
        assert!(latency.average <= latency.max);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn read_errors_are_counted_not_raised() {
        init();

        let store = Arc::new(MockStore::new(0..=999).with_error_rate(0.25));
        let config = RunConfig::new()
            .workers(4)
            .operations_per_worker(5_000)
            .key_range(0, 999);

        let stats = ReadTest::new(store, config).run().await.unwrap();
        assert_eq!(stats.total_operations, 20_000);
        assert!(
            (stats.success_rate - 0.75).abs() < 0.02,
            "success_rate={}",
            stats.success_rate
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unavailable_store_reports_zero_success() {
        init();

        let store = Arc::new(MockStore::new(0..=999).with_error_rate(1.));
        let config = RunConfig::new()
            .workers(2)
            .operations_per_worker(500)
            .key_range(0, 999);

        let stats = ReadTest::new(store, config).run().await.unwrap();
        assert_eq!(stats.failed_operations, 1_000);
        assert_eq!(stats.success_rate, 0.);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn overloaded_store_fails_excess_reads() {
        init();

        let store = Arc::new(MockStore::new(0..=999).with_max_tps(NonZeroU32::new(100).unwrap()));
        let config = RunConfig::new()
            .workers(2)
            .operations_per_worker(5_000)
            .key_range(0, 999);

        let stats = ReadTest::new(store, config).run().await.unwrap();
        assert_eq!(stats.total_operations, 10_000);
        assert!(stats.failed_operations > stats.successful_operations);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[ntest::timeout(10_000)]
    async fn deadline_bounds_a_hanging_store() {
        init();

        let store = Arc::new(MockStore::new(0..=999).hanging());
        let config = RunConfig::new()
            .workers(4)
            .warmup_operations(10)
            .duration(Duration::from_secs(1))
            .key_range(0, 999);

        let begin = Instant::now();
        let stats = ReadTest::new(store, config).run().await.unwrap();

        assert!(begin.elapsed() < Duration::from_secs(3));
        assert_eq!(stats.total_operations, 0);
        assert_eq!(stats.workers, 4);
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        init();

        let store = Arc::new(MockStore::new(0..=999));
        let config = RunConfig::new().operations_per_worker(10).key_range(10, 1);

        let err = ReadTest::new(store.clone(), config).run().await.unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
        assert_eq!(store.total_reads(), 0);
    }
}
