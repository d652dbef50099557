// Domain models

mod aggregate;
mod arn;
mod cost;
mod metrics;
mod resource;

pub use aggregate::{InstanceSummary, LoadState};
pub use arn::{ArnParseError, ResourceArn, ServiceKind};
pub use cost::CostEstimate;
pub use metrics::{BucketedMetrics, LatestMetrics, MetricBucket, MetricSample, round_dp};
pub use resource::DiscoveredResource;
