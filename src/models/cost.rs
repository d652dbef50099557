use serde::Serialize;

use super::{ResourceArn, ServiceKind};

/// Best-effort running-cost estimate: hourly on-demand rate times hours since
/// the resource was launched or created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub arn: ResourceArn,
    pub kind: ServiceKind,
    /// Instance type / DB class; `"N/A"` for load balancers.
    pub shape: String,
    /// USD, rounded to 4 decimal places.
    pub cost_usd: f64,
    /// Rounded to 2 decimal places.
    pub hours_elapsed: f64,
}
