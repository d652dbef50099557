// Discovery output: one record per existing resource, before any metrics join.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ResourceArn, ServiceKind};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredResource {
    pub arn: ResourceArn,
    pub kind: ServiceKind,
    /// Display name; `"N/A"` when the resource carries no Name tag.
    pub name: String,
    /// Provider lifecycle state (running / available / active / ...).
    pub status: String,
    /// Instance type or DB class; None for load balancers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Launch or creation time; None when the provider did not report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
}
