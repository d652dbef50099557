use serde::Serialize;

use super::{ResourceArn, ServiceKind};

/// Coarse qualitative load level derived from a single metric sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Low,
    Medium,
    High,
    Unknown,
}

/// The unit returned by the aggregation orchestrator: one live resource with
/// its classified state and estimated running cost. Built fresh per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSummary {
    pub arn: ResourceArn,
    pub kind: ServiceKind,
    pub name: String,
    pub state: LoadState,
    pub cost_usd: f64,
}
