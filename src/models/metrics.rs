// Metric records. "No data" is a typed absence, never zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ResourceArn, ServiceKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl MetricSample {
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            value: Some(value),
            timestamp: Some(timestamp),
        }
    }

    pub fn missing() -> Self {
        Self {
            value: None,
            timestamp: None,
        }
    }
}

/// Latest value per metric for one resource. `metrics` always carries the
/// kind's full fixed vocabulary, missing samples included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestMetrics {
    pub arn: ResourceArn,
    pub kind: ServiceKind,
    pub name: String,
    pub status: String,
    pub metrics: BTreeMap<String, MetricSample>,
    /// Max timestamp across metrics that had data.
    pub timestamp: Option<DateTime<Utc>>,
}

/// One fixed-width time bucket; only emitted when at least one sample landed
/// in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBucket {
    pub start: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketedMetrics {
    pub arn: ResourceArn,
    /// Ascending by bucket start.
    pub buckets: Vec<MetricBucket>,
}

/// Round to `dp` decimal places (wire-level display rounding).
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}
