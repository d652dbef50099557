// Structured resource identifiers. ARNs are parsed once at the boundary and
// carried as typed values; all kind dispatch switches on ServiceKind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The three resource kinds the service monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Ec2,
    Rds,
    Alb,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Ec2 => "ec2",
            ServiceKind::Rds => "rds",
            ServiceKind::Alb => "alb",
        }
    }

    /// The service segment as it appears inside an ARN.
    fn arn_service(&self) -> &'static str {
        match self {
            ServiceKind::Ec2 => "ec2",
            ServiceKind::Rds => "rds",
            ServiceKind::Alb => "elasticloadbalancing",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArnParseError {
    #[error("malformed arn: {0}")]
    Malformed(String),
    #[error("unsupported service {service:?} in arn: {arn}")]
    UnsupportedService { arn: String, service: String },
}

/// Parsed ARN: `arn:{partition}:{service}:{region}:{account}:{resource}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceArn {
    pub partition: String,
    pub service: ServiceKind,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl ResourceArn {
    pub fn ec2_instance(region: &str, account_id: &str, instance_id: &str) -> Self {
        Self {
            partition: "aws".into(),
            service: ServiceKind::Ec2,
            region: region.into(),
            account_id: account_id.into(),
            resource: format!("instance/{instance_id}"),
        }
    }

    pub fn rds_db(region: &str, account_id: &str, identifier: &str) -> Self {
        Self {
            partition: "aws".into(),
            service: ServiceKind::Rds,
            region: region.into(),
            account_id: account_id.into(),
            resource: format!("db:{identifier}"),
        }
    }

    /// The dimension value the monitoring API keys this resource by:
    /// instance id, DB identifier, or the `app/{name}/{hash}` ALB suffix.
    pub fn metric_dimension(&self) -> &str {
        let stripped = match self.service {
            ServiceKind::Ec2 => self.resource.strip_prefix("instance/"),
            ServiceKind::Rds => self.resource.strip_prefix("db:"),
            ServiceKind::Alb => self.resource.strip_prefix("loadbalancer/"),
        };
        stripped.unwrap_or(&self.resource)
    }
}

impl FromStr for ResourceArn {
    type Err = ArnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        let [prefix, partition, service, region, account_id, resource] = parts[..] else {
            return Err(ArnParseError::Malformed(s.to_string()));
        };
        if prefix != "arn" || resource.is_empty() {
            return Err(ArnParseError::Malformed(s.to_string()));
        }
        let service = match service {
            "ec2" => ServiceKind::Ec2,
            "rds" => ServiceKind::Rds,
            "elasticloadbalancing" => ServiceKind::Alb,
            other => {
                return Err(ArnParseError::UnsupportedService {
                    arn: s.to_string(),
                    service: other.to_string(),
                });
            }
        };
        Ok(Self {
            partition: partition.to_string(),
            service,
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: resource.to_string(),
        })
    }
}

impl fmt::Display for ResourceArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition,
            self.service.arn_service(),
            self.region,
            self.account_id,
            self.resource
        )
    }
}

impl Serialize for ResourceArn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceArn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
