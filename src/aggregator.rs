// Aggregation orchestrator: discovery, the three latest-metric fetches and
// cost estimation behind one gather barrier, then a pure join. Any kind's
// failure fails the whole aggregate; per-item data gaps become unknown/0.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use crate::aws_repo::AwsRepo;
use crate::aws_repo::catalog::primary_metric;
use crate::config::MetricsConfig;
use crate::models::{CostEstimate, InstanceSummary, LatestMetrics, ServiceKind};
use crate::pricing::PricingRepo;
use crate::state::{CPU_THRESHOLDS, RESPONSE_TIME_THRESHOLDS, classify};

pub struct Aggregator {
    aws: Arc<AwsRepo>,
    pricing: Arc<PricingRepo>,
    config: MetricsConfig,
}

/// Lifecycle states that make a resource part of the aggregate at all.
fn is_live(kind: ServiceKind, status: &str) -> bool {
    match kind {
        ServiceKind::Ec2 => status == "running",
        ServiceKind::Rds => status == "available",
        ServiceKind::Alb => status == "active",
    }
}

/// Join latest metrics with the cost map: live resources only, classified on
/// the kind's primary metric, cost defaulting to 0.0 when the estimator
/// produced no entry.
pub fn join_records(
    latest: &[LatestMetrics],
    costs: &HashMap<String, f64>,
) -> Vec<InstanceSummary> {
    latest
        .iter()
        .filter(|record| is_live(record.kind, &record.status))
        .map(|record| {
            let value = record
                .metrics
                .get(primary_metric(record.kind))
                .and_then(|sample| sample.value);
            let thresholds = match record.kind {
                ServiceKind::Ec2 | ServiceKind::Rds => CPU_THRESHOLDS,
                ServiceKind::Alb => RESPONSE_TIME_THRESHOLDS,
            };
            InstanceSummary {
                arn: record.arn.clone(),
                kind: record.kind,
                name: record.name.clone(),
                state: classify(value, thresholds),
                cost_usd: costs.get(&record.arn.to_string()).copied().unwrap_or(0.0),
            }
        })
        .collect()
}

impl Aggregator {
    pub fn new(aws: Arc<AwsRepo>, pricing: Arc<PricingRepo>, config: MetricsConfig) -> Self {
        Self {
            aws,
            pricing,
            config,
        }
    }

    /// One normalized record per live resource. Read-only against AWS, so
    /// repeated calls inside a cache window are safe.
    #[instrument(skip(self), fields(operation = "get_aggregate"))]
    pub async fn get_aggregate(&self) -> anyhow::Result<Vec<InstanceSummary>> {
        let (ec2, rds, alb) = tokio::try_join!(
            self.aws.list_ec2_instances(),
            self.aws.list_db_instances(),
            self.aws.list_load_balancers(),
        )?;

        let window = self.config.window_minutes;
        let delay = self.config.delay_minutes;
        let (ec2_metrics, rds_metrics, alb_metrics, costs) = tokio::join!(
            self.aws.fetch_latest(ServiceKind::Ec2, &ec2, window, delay),
            self.aws.fetch_latest(ServiceKind::Rds, &rds, window, delay),
            self.aws.fetch_latest(ServiceKind::Alb, &alb, window, delay),
            self.pricing.estimate_costs(&ec2, &rds, &alb),
        );

        let mut latest = ec2_metrics?;
        latest.extend(rds_metrics?);
        latest.extend(alb_metrics?);

        let cost_map: HashMap<String, f64> = costs
            .iter()
            .map(|c| (c.arn.to_string(), c.cost_usd))
            .collect();

        Ok(join_records(&latest, &cost_map))
    }

    /// Latest metrics for every kind, concurrently (GET /metrics).
    #[instrument(skip(self), fields(operation = "get_latest_all"))]
    pub async fn get_latest_all(&self) -> anyhow::Result<Vec<LatestMetrics>> {
        let (ec2, rds, alb) = tokio::try_join!(
            self.aws.list_ec2_instances(),
            self.aws.list_db_instances(),
            self.aws.list_load_balancers(),
        )?;
        let window = self.config.window_minutes;
        let delay = self.config.delay_minutes;
        let (mut out, rds_metrics, alb_metrics) = tokio::try_join!(
            self.aws.fetch_latest(ServiceKind::Ec2, &ec2, window, delay),
            self.aws.fetch_latest(ServiceKind::Rds, &rds, window, delay),
            self.aws.fetch_latest(ServiceKind::Alb, &alb, window, delay),
        )?;
        out.extend(rds_metrics);
        out.extend(alb_metrics);
        Ok(out)
    }

    /// Cost estimates for everything currently discovered (GET /costs).
    #[instrument(skip(self), fields(operation = "get_costs"))]
    pub async fn get_costs(&self) -> anyhow::Result<Vec<CostEstimate>> {
        let (ec2, rds, alb) = tokio::try_join!(
            self.aws.list_ec2_instances(),
            self.aws.list_db_instances(),
            self.aws.list_load_balancers(),
        )?;
        Ok(self.pricing.estimate_costs(&ec2, &rds, &alb).await)
    }
}
