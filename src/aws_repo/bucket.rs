// Pure batching and bucketing helpers. I/O stays in cloudwatch.rs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::catalog::{MetricSpec, Semantic};
use crate::models::MetricBucket;

/// GetMetricData caps queries per call; 20 resources x 6 metrics stays under
/// the limit with headroom.
pub const MAX_RESOURCES_PER_CALL: usize = 20;

/// Partition resources into monitoring-API batches: exactly ceil(n / limit)
/// batches for n resources.
pub fn batches<T>(items: &[T]) -> std::slice::Chunks<'_, T> {
    items.chunks(MAX_RESOURCES_PER_CALL)
}

/// Start of the bucket containing `ts`: aligned to `width_minutes` from the
/// Unix epoch, independent of query start or which metric produced the sample.
pub fn bucket_start(ts: DateTime<Utc>, width_minutes: u32) -> DateTime<Utc> {
    let width_secs = i64::from(width_minutes) * 60;
    let secs = ts.timestamp();
    let aligned = secs - secs.rem_euclid(width_secs);
    DateTime::from_timestamp(aligned, 0).unwrap_or(ts)
}

#[derive(Default)]
struct Accum {
    sum: f64,
    count: u32,
}

/// Fold per-metric time series into half-open buckets. Counts sum, gauges
/// average; buckets with no samples are omitted, not zero-filled. Output is
/// ascending by bucket start.
pub fn bucketize(
    per_metric: &[(&MetricSpec, Vec<(DateTime<Utc>, f64)>)],
    width_minutes: u32,
) -> Vec<MetricBucket> {
    let mut by_bucket: BTreeMap<i64, BTreeMap<&'static str, Accum>> = BTreeMap::new();
    for (spec, points) in per_metric {
        for (ts, value) in points {
            let start = bucket_start(*ts, width_minutes).timestamp();
            let acc = by_bucket
                .entry(start)
                .or_default()
                .entry(spec.key)
                .or_default();
            acc.sum += value;
            acc.count += 1;
        }
    }

    let semantics: BTreeMap<&str, Semantic> = per_metric
        .iter()
        .map(|(spec, _)| (spec.key, spec.semantic))
        .collect();

    by_bucket
        .into_iter()
        .filter_map(|(start_secs, metrics)| {
            let start = DateTime::from_timestamp(start_secs, 0)?;
            let values = metrics
                .into_iter()
                .map(|(key, acc)| {
                    let v = match semantics.get(key) {
                        Some(Semantic::Count) => acc.sum,
                        _ => acc.sum / f64::from(acc.count.max(1)),
                    };
                    (key.to_string(), v)
                })
                .collect();
            Some(MetricBucket { start, values })
        })
        .collect()
}
