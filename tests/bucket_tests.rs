// Batching and bucketing tests: ceil(N/20) partitioning, epoch-aligned
// bucket boundaries, counts-sum vs gauges-average.

use awspulse::aws_repo::bucket::{MAX_RESOURCES_PER_CALL, batches, bucket_start, bucketize};
use awspulse::aws_repo::catalog::specs_for;
use awspulse::models::ServiceKind;
use chrono::{DateTime, Utc};

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

#[test]
fn batches_are_ceil_of_n_over_limit() {
    for (n, expected) in [(0usize, 0usize), (1, 1), (19, 1), (20, 1), (21, 2), (45, 3)] {
        let items: Vec<u32> = (0..n as u32).collect();
        assert_eq!(batches(&items).count(), expected, "n = {n}");
    }
}

#[test]
fn batches_never_exceed_limit() {
    let items: Vec<u32> = (0..53).collect();
    for batch in batches(&items) {
        assert!(batch.len() <= MAX_RESOURCES_PER_CALL);
    }
}

#[test]
fn bucket_start_is_multiple_of_width_from_epoch() {
    let width = 10;
    for secs in [0, 1, 599, 600, 12_345, 1_700_000_123] {
        let start = bucket_start(ts(secs), width);
        assert_eq!(start.timestamp() % (i64::from(width) * 60), 0);
        assert!(start.timestamp() <= secs);
        assert!(secs - start.timestamp() < i64::from(width) * 60);
    }
}

#[test]
fn bucket_start_is_independent_of_metric_or_resource() {
    // Same timestamp always lands in the same bucket, whatever produced it.
    assert_eq!(bucket_start(ts(12_345), 10), ts(12_000));
    assert_eq!(bucket_start(ts(12_599), 10), ts(12_000));
    assert_eq!(bucket_start(ts(12_600), 10), ts(12_600));
}

#[test]
fn bucketize_sums_counts_and_averages_gauges() {
    let specs = specs_for(ServiceKind::Alb);
    let request_count = &specs[0]; // Count semantic
    let response_time = &specs[1]; // Gauge semantic
    assert_eq!(request_count.key, "request_count");
    assert_eq!(response_time.key, "target_response_time");

    let per_metric = vec![
        (request_count, vec![(ts(600), 10.0), (ts(660), 30.0)]),
        (response_time, vec![(ts(600), 0.2), (ts(660), 0.4)]),
    ];
    let buckets = bucketize(&per_metric, 10);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].start, ts(600));
    assert_eq!(buckets[0].values["request_count"], 40.0);
    assert_eq!(buckets[0].values["target_response_time"], 0.3);
}

#[test]
fn bucketize_omits_empty_buckets_and_sorts_ascending() {
    let specs = specs_for(ServiceKind::Ec2);
    let cpu = &specs[0];
    assert_eq!(cpu.key, "cpu_utilization");

    // Samples in buckets [600, 1200) and [2400, 3000); [1200, 2400) stays empty.
    let per_metric = vec![(cpu, vec![(ts(2_500), 50.0), (ts(700), 10.0)])];
    let buckets = bucketize(&per_metric, 10);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].start, ts(600));
    assert_eq!(buckets[1].start, ts(2_400));
    for bucket in &buckets {
        assert!(!bucket.values.is_empty());
    }
}

#[test]
fn bucketize_empty_input_produces_no_buckets() {
    let specs = specs_for(ServiceKind::Rds);
    let per_metric = vec![(&specs[0], vec![])];
    assert!(bucketize(&per_metric, 10).is_empty());
}
