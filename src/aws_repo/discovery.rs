// Control-plane listing of EC2 instances, RDS DB instances and ALBs.

use std::str::FromStr;

use aws_sdk_elasticloadbalancingv2::types::LoadBalancerTypeEnum;
use chrono::{DateTime, Utc};
use tracing::{instrument, warn};

use super::AwsRepo;
use crate::models::{DiscoveredResource, ResourceArn, ServiceKind};

fn to_chrono(ts: &aws_sdk_ec2::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

impl AwsRepo {
    pub async fn discover(&self, kind: ServiceKind) -> anyhow::Result<Vec<DiscoveredResource>> {
        match kind {
            ServiceKind::Ec2 => self.list_ec2_instances().await,
            ServiceKind::Rds => self.list_db_instances().await,
            ServiceKind::Alb => self.list_load_balancers().await,
        }
    }

    #[instrument(skip(self), fields(repo = "aws", operation = "list_ec2_instances"))]
    pub async fn list_ec2_instances(&self) -> anyhow::Result<Vec<DiscoveredResource>> {
        let mut out = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut req = self.ec2.describe_instances();
            if let Some(t) = token.as_deref() {
                req = req.next_token(t);
            }
            let resp = req.send().await?;

            for reservation in resp.reservations() {
                for inst in reservation.instances() {
                    let Some(instance_id) = inst.instance_id() else {
                        continue;
                    };
                    let name = inst
                        .tags()
                        .iter()
                        .find(|t| t.key() == Some("Name"))
                        .and_then(|t| t.value())
                        .unwrap_or("N/A")
                        .to_string();
                    let status = inst
                        .state()
                        .and_then(|s| s.name())
                        .map(|n| n.as_str().to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    out.push(DiscoveredResource {
                        arn: ResourceArn::ec2_instance(&self.region, &self.account_id, instance_id),
                        kind: ServiceKind::Ec2,
                        name,
                        status,
                        shape: inst.instance_type().map(|t| t.as_str().to_string()),
                        created_at: inst.launch_time().and_then(to_chrono),
                        dns_name: None,
                    });
                }
            }

            token = resp.next_token().map(str::to_string);
            if token.is_none() {
                break;
            }
        }
        Ok(out)
    }

    #[instrument(skip(self), fields(repo = "aws", operation = "list_db_instances"))]
    pub async fn list_db_instances(&self) -> anyhow::Result<Vec<DiscoveredResource>> {
        let mut out = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut req = self.rds.describe_db_instances();
            if let Some(m) = marker.as_deref() {
                req = req.marker(m);
            }
            let resp = req.send().await?;

            for db in resp.db_instances() {
                let Some(identifier) = db.db_instance_identifier() else {
                    continue;
                };
                // The API reports the ARN; synthesize only when it is absent.
                let arn = db
                    .db_instance_arn()
                    .and_then(|s| ResourceArn::from_str(s).ok())
                    .unwrap_or_else(|| {
                        ResourceArn::rds_db(&self.region, &self.account_id, identifier)
                    });
                out.push(DiscoveredResource {
                    arn,
                    kind: ServiceKind::Rds,
                    name: identifier.to_string(),
                    status: db
                        .db_instance_status()
                        .unwrap_or("unknown")
                        .to_string(),
                    shape: db.db_instance_class().map(str::to_string),
                    created_at: db
                        .instance_create_time()
                        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
                    dns_name: None,
                });
            }

            marker = resp.marker().map(str::to_string);
            if marker.is_none() {
                break;
            }
        }
        Ok(out)
    }

    /// Application load balancers only; other ELB types are skipped.
    #[instrument(skip(self), fields(repo = "aws", operation = "list_load_balancers"))]
    pub async fn list_load_balancers(&self) -> anyhow::Result<Vec<DiscoveredResource>> {
        let mut out = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut req = self.elbv2.describe_load_balancers();
            if let Some(m) = marker.as_deref() {
                req = req.marker(m);
            }
            let resp = req.send().await?;

            for lb in resp.load_balancers() {
                if lb.r#type() != Some(&LoadBalancerTypeEnum::Application) {
                    continue;
                }
                let Some(arn_str) = lb.load_balancer_arn() else {
                    continue;
                };
                let arn = match ResourceArn::from_str(arn_str) {
                    Ok(arn) => arn,
                    Err(e) => {
                        warn!(error = %e, arn = arn_str, "skipping unparseable load balancer arn");
                        continue;
                    }
                };
                out.push(DiscoveredResource {
                    arn,
                    kind: ServiceKind::Alb,
                    name: lb.load_balancer_name().unwrap_or("N/A").to_string(),
                    status: lb
                        .state()
                        .and_then(|s| s.code())
                        .map(|c| c.as_str().to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    shape: None,
                    created_at: lb
                        .created_time()
                        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
                    dns_name: lb.dns_name().map(str::to_string),
                });
            }

            marker = resp.next_marker().map(str::to_string);
            if marker.is_none() {
                break;
            }
        }
        Ok(out)
    }
}
