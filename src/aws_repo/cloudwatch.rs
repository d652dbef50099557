// Batched CloudWatch queries. One GetMetricData call per batch of resources
// carries every (resource x metric) query for the kind: O(batches) calls
// instead of O(resources x metrics).

use std::collections::{BTreeMap, HashMap};

use anyhow::Context;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Dimension, Metric, MetricDataQuery, MetricStat, ScanBy};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::try_join_all;
use tracing::instrument;

use super::AwsRepo;
use super::bucket::{batches, bucketize};
use super::catalog::{dimension_name, namespace, specs_for};
use crate::models::{
    BucketedMetrics, DiscoveredResource, LatestMetrics, MetricSample, ResourceArn, ServiceKind,
};

/// Matches the finest CloudWatch resolution for detailed monitoring.
const PERIOD_SECONDS: i32 = 60;

type Series = Vec<(DateTime<Utc>, f64)>;

/// Query window `[now - delay - window, now - delay)`.
fn query_window(window_minutes: u32, delay_minutes: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = Utc::now() - Duration::minutes(i64::from(delay_minutes));
    let start = end - Duration::minutes(i64::from(window_minutes));
    (start, end)
}

fn query_id(resource_idx: usize, metric_idx: usize) -> String {
    format!("r{resource_idx}m{metric_idx}")
}

impl AwsRepo {
    /// Latest value per metric for each resource of `kind`. Resources with no
    /// datapoints in the window get the full vocabulary of missing samples.
    #[instrument(skip(self, resources), fields(repo = "cloudwatch", operation = "fetch_latest", kind = kind.as_str(), resources = resources.len()))]
    pub async fn fetch_latest(
        &self,
        kind: ServiceKind,
        resources: &[DiscoveredResource],
        window_minutes: u32,
        delay_minutes: u32,
    ) -> anyhow::Result<Vec<LatestMetrics>> {
        let (start, end) = query_window(window_minutes, delay_minutes);
        let specs = specs_for(kind);
        let mut out = Vec::with_capacity(resources.len());

        let results = try_join_all(
            batches(resources).map(|batch| self.query_batch(kind, batch, start, end)),
        )
        .await?;

        for (batch, series_by_id) in batches(resources).zip(results) {
            for (i, resource) in batch.iter().enumerate() {
                let mut metrics = BTreeMap::new();
                let mut latest_timestamp: Option<DateTime<Utc>> = None;
                for (j, spec) in specs.iter().enumerate() {
                    // Newest-first ordering: the head of the series is the latest.
                    let sample = series_by_id
                        .get(&query_id(i, j))
                        .and_then(|series| series.first())
                        .map(|(ts, v)| MetricSample::new(*v, *ts))
                        .unwrap_or_else(MetricSample::missing);
                    if let Some(ts) = sample.timestamp {
                        latest_timestamp = Some(latest_timestamp.map_or(ts, |t| t.max(ts)));
                    }
                    metrics.insert(spec.key.to_string(), sample);
                }
                out.push(LatestMetrics {
                    arn: resource.arn.clone(),
                    kind,
                    name: resource.name.clone(),
                    status: resource.status.clone(),
                    metrics,
                    timestamp: latest_timestamp,
                });
            }
        }
        Ok(out)
    }

    /// Full windowed series per resource, folded into fixed-width buckets
    /// aligned to the epoch. Empty buckets are omitted.
    #[instrument(skip(self, resources), fields(repo = "cloudwatch", operation = "fetch_over_time", kind = kind.as_str(), resources = resources.len()))]
    pub async fn fetch_over_time(
        &self,
        kind: ServiceKind,
        resources: &[DiscoveredResource],
        window_minutes: u32,
        delay_minutes: u32,
        bucket_width_minutes: u32,
    ) -> anyhow::Result<Vec<BucketedMetrics>> {
        let (start, end) = query_window(window_minutes, delay_minutes);
        let specs = specs_for(kind);
        let mut out = Vec::with_capacity(resources.len());

        let results = try_join_all(
            batches(resources).map(|batch| self.query_batch(kind, batch, start, end)),
        )
        .await?;

        for (batch, series_by_id) in batches(resources).zip(results) {
            for (i, resource) in batch.iter().enumerate() {
                let per_metric: Vec<_> = specs
                    .iter()
                    .enumerate()
                    .map(|(j, spec)| {
                        let series = series_by_id.get(&query_id(i, j)).cloned().unwrap_or_default();
                        (spec, series)
                    })
                    .collect();
                out.push(BucketedMetrics {
                    arn: resource.arn.clone(),
                    buckets: bucketize(&per_metric, bucket_width_minutes),
                });
            }
        }
        Ok(out)
    }

    /// Windowed metrics for one resource named by ARN (chat persona context).
    /// None when the resource is not currently discovered.
    pub async fn get_metrics_by_arn(
        &self,
        arn: &ResourceArn,
        window_minutes: u32,
        delay_minutes: u32,
        bucket_width_minutes: u32,
    ) -> anyhow::Result<Option<BucketedMetrics>> {
        let resources = self.discover(arn.service).await?;
        let Some(resource) = resources.into_iter().find(|r| r.arn == *arn) else {
            return Ok(None);
        };
        let mut records = self
            .fetch_over_time(
                arn.service,
                std::slice::from_ref(&resource),
                window_minutes,
                delay_minutes,
                bucket_width_minutes,
            )
            .await?;
        Ok(records.pop())
    }

    /// One GetMetricData call (plus pagination) for a batch of <= 20
    /// resources, all metrics of the kind, newest first.
    async fn query_batch(
        &self,
        kind: ServiceKind,
        batch: &[DiscoveredResource],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<String, Series>> {
        let specs = specs_for(kind);
        let mut queries = Vec::with_capacity(batch.len() * specs.len());
        for (i, resource) in batch.iter().enumerate() {
            for (j, spec) in specs.iter().enumerate() {
                queries.push(
                    MetricDataQuery::builder()
                        .id(query_id(i, j))
                        .metric_stat(
                            MetricStat::builder()
                                .metric(
                                    Metric::builder()
                                        .namespace(namespace(kind))
                                        .metric_name(spec.name)
                                        .dimensions(
                                            Dimension::builder()
                                                .name(dimension_name(kind))
                                                .value(resource.arn.metric_dimension())
                                                .build(),
                                        )
                                        .build(),
                                )
                                .period(PERIOD_SECONDS)
                                .stat(spec.semantic.statistic())
                                .unit(spec.unit.clone())
                                .build(),
                        )
                        .return_data(true)
                        .build(),
                );
            }
        }

        let mut series_by_id: HashMap<String, Series> = HashMap::new();
        let mut token: Option<String> = None;
        loop {
            let mut req = self
                .cloudwatch
                .get_metric_data()
                .start_time(AwsDateTime::from_secs(start.timestamp()))
                .end_time(AwsDateTime::from_secs(end.timestamp()))
                .scan_by(ScanBy::TimestampDescending)
                .set_metric_data_queries(Some(queries.clone()));
            if let Some(t) = token.as_deref() {
                req = req.next_token(t);
            }
            let resp = req
                .send()
                .await
                .with_context(|| format!("GetMetricData for {} batch failed", kind.as_str()))?;

            for result in resp.metric_data_results() {
                let Some(id) = result.id() else {
                    continue;
                };
                let series = series_by_id.entry(id.to_string()).or_default();
                for (ts, value) in result.timestamps().iter().zip(result.values()) {
                    if let Some(ts) = DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()) {
                        series.push((ts, *value));
                    }
                }
            }

            token = resp.next_token().map(str::to_string);
            if token.is_none() {
                break;
            }
        }
        Ok(series_by_id)
    }
}
