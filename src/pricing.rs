// On-demand price lookups with a process-lifetime cache, and the running-cost
// estimator. A missing or failed price is 0.0, never an aggregation failure.

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_pricing::types::{Filter, FilterType};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use crate::models::{CostEstimate, DiscoveredResource, ServiceKind, round_dp};

/// Elapsed-time stand-in when the provider reports no creation time.
pub const FALLBACK_ELAPSED_HOURS: f64 = 24.0;

/// Pricing catalog location names for region codes. An unmapped region falls
/// back to the code itself (best effort; likely a zero rate).
const REGION_TO_LOCATION: &[(&str, &str)] = &[
    ("us-east-1", "US East (N. Virginia)"),
    ("us-east-2", "US East (Ohio)"),
    ("us-west-1", "US West (N. California)"),
    ("us-west-2", "US West (Oregon)"),
    ("eu-west-1", "EU (Ireland)"),
    ("eu-central-1", "EU (Frankfurt)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("ap-northeast-2", "Asia Pacific (Seoul)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
];

pub fn region_to_location(region: &str) -> String {
    REGION_TO_LOCATION
        .iter()
        .find(|(code, _)| *code == region)
        .map(|(_, location)| (*location).to_string())
        .unwrap_or_else(|| region.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceKey {
    pub shape: String,
    pub location: String,
    /// OS for compute, engine for database, constant for load balancers.
    pub attribute: String,
}

/// In-memory hourly-rate cache, keyed (shape, location, attribute). Lives for
/// the process; never invalidated. Concurrent population of the same key may
/// race into a redundant lookup; last write wins with an identical value.
#[derive(Default)]
pub struct PriceCache {
    inner: RwLock<HashMap<PriceKey, f64>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &PriceKey) -> Option<f64> {
        self.inner.read().await.get(key).copied()
    }

    pub async fn insert(&self, key: PriceKey, rate: f64) {
        self.inner.write().await.insert(key, rate);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// First on-demand price dimension's USD rate out of a pricing-catalog
/// PriceList entry.
pub fn parse_price_list(entry: &str) -> Option<f64> {
    let value: serde_json::Value = serde_json::from_str(entry).ok()?;
    let on_demand = value.get("terms")?.get("OnDemand")?.as_object()?;
    let term = on_demand.values().next()?;
    let dimensions = term.get("priceDimensions")?.as_object()?;
    let dimension = dimensions.values().next()?;
    dimension
        .get("pricePerUnit")?
        .get("USD")?
        .as_str()?
        .parse()
        .ok()
}

/// Cost and elapsed hours for one resource: rate x hours since creation, with
/// the 24-hour fallback when creation time is unknown. Cost rounds to 4 dp,
/// hours to 2 dp.
pub fn cost_for(
    hourly_rate: f64,
    created_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (f64, f64) {
    let hours = created_at
        .map(|t| (now - t).num_seconds() as f64 / 3600.0)
        .unwrap_or(FALLBACK_ELAPSED_HOURS);
    (round_dp(hourly_rate * hours, 4), round_dp(hours, 2))
}

pub struct PricingRepo {
    client: aws_sdk_pricing::Client,
    cache: Arc<PriceCache>,
    location: String,
}

impl PricingRepo {
    pub fn new(client: aws_sdk_pricing::Client, cache: Arc<PriceCache>, region: &str) -> Self {
        Self {
            client,
            cache,
            location: region_to_location(region),
        }
    }

    /// Hourly on-demand USD rate for a resource shape. Cache first; on miss an
    /// exact-filter catalog query. Any error or no-match degrades to 0.0.
    #[instrument(skip(self), fields(repo = "pricing", operation = "hourly_rate", kind = kind.as_str()))]
    pub async fn hourly_rate(&self, kind: ServiceKind, shape: &str) -> f64 {
        let (service_code, attribute, filters): (_, _, Vec<(&str, &str)>) = match kind {
            ServiceKind::Ec2 => (
                "AmazonEC2",
                "Linux",
                vec![
                    ("instanceType", shape),
                    ("location", &self.location),
                    ("operatingSystem", "Linux"),
                    ("preInstalledSw", "NA"),
                    ("tenancy", "Shared"),
                    ("capacitystatus", "Used"),
                ],
            ),
            ServiceKind::Rds => (
                "AmazonRDS",
                "MySQL",
                vec![
                    ("instanceType", shape),
                    ("location", &self.location),
                    ("databaseEngine", "MySQL"),
                    ("deploymentOption", "Single-AZ"),
                ],
            ),
            ServiceKind::Alb => (
                "AWSELB",
                "loadbalancer",
                vec![
                    ("location", &self.location),
                    ("productFamily", "Load Balancer"),
                ],
            ),
        };

        let key = PriceKey {
            shape: shape.to_string(),
            location: self.location.clone(),
            attribute: attribute.to_string(),
        };
        if let Some(rate) = self.cache.get(&key).await {
            return rate;
        }

        match self.lookup(service_code, &filters).await {
            Ok(Some(rate)) => {
                self.cache.insert(key, rate).await;
                rate
            }
            Ok(None) => {
                warn!(shape, location = %self.location, "no catalog match, rate defaults to 0.0");
                0.0
            }
            Err(e) => {
                warn!(error = %e, shape, "price lookup failed, rate defaults to 0.0");
                0.0
            }
        }
    }

    async fn lookup(
        &self,
        service_code: &str,
        filters: &[(&str, &str)],
    ) -> anyhow::Result<Option<f64>> {
        let filters = filters
            .iter()
            .map(|(field, value)| {
                Filter::builder()
                    .r#type(FilterType::TermMatch)
                    .field(*field)
                    .value(*value)
                    .build()
                    .map_err(anyhow::Error::from)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let resp = self
            .client
            .get_products()
            .service_code(service_code)
            .format_version("aws_v1")
            .max_results(1)
            .set_filters(Some(filters))
            .send()
            .await?;

        Ok(resp.price_list().first().and_then(|s| parse_price_list(s)))
    }

    /// Cost estimates for all discovered resources. The three kind collectors
    /// run concurrently; databases are only billed while available.
    #[instrument(skip_all, fields(repo = "pricing", operation = "estimate_costs"))]
    pub async fn estimate_costs(
        &self,
        ec2: &[DiscoveredResource],
        rds: &[DiscoveredResource],
        alb: &[DiscoveredResource],
    ) -> Vec<CostEstimate> {
        let rds_available: Vec<&DiscoveredResource> = rds
            .iter()
            .filter(|r| r.status == "available")
            .collect();
        let (mut out, rds_costs, alb_costs) = tokio::join!(
            self.collect(ec2.iter()),
            self.collect(rds_available.iter().copied()),
            self.collect(alb.iter()),
        );
        out.extend(rds_costs);
        out.extend(alb_costs);
        out
    }

    async fn collect<'a>(
        &self,
        resources: impl Iterator<Item = &'a DiscoveredResource>,
    ) -> Vec<CostEstimate> {
        let now = Utc::now();
        let mut out = Vec::new();
        for resource in resources {
            let shape = resource.shape.as_deref().unwrap_or("loadbalancer");
            let rate = self.hourly_rate(resource.kind, shape).await;
            let (cost_usd, hours_elapsed) = cost_for(rate, resource.created_at, now);
            out.push(CostEstimate {
                arn: resource.arn.clone(),
                kind: resource.kind,
                shape: if resource.shape.is_some() {
                    shape.to_string()
                } else {
                    "N/A".to_string()
                },
                cost_usd,
                hours_elapsed,
            });
        }
        out
    }
}
