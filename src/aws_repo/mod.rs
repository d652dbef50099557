// Cloud-facing repo: control-plane discovery and CloudWatch batch queries.

pub mod bucket;
pub mod catalog;
mod cloudwatch;
mod discovery;

use aws_config::{BehaviorVersion, SdkConfig};

pub struct AwsRepo {
    ec2: aws_sdk_ec2::Client,
    rds: aws_sdk_rds::Client,
    elbv2: aws_sdk_elasticloadbalancingv2::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
    region: String,
    account_id: String,
}

impl AwsRepo {
    /// Build from an already-loaded SDK config with a known account id
    /// (no network; used by tests).
    pub fn new(conf: &SdkConfig, region: &str, account_id: &str) -> Self {
        Self {
            ec2: aws_sdk_ec2::Client::new(conf),
            rds: aws_sdk_rds::Client::new(conf),
            elbv2: aws_sdk_elasticloadbalancingv2::Client::new(conf),
            cloudwatch: aws_sdk_cloudwatch::Client::new(conf),
            region: region.to_string(),
            account_id: account_id.to_string(),
        }
    }

    /// Load default credentials/region and resolve the account id via STS.
    pub async fn connect() -> anyhow::Result<Self> {
        let conf = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let region = conf
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| "us-east-1".to_string());
        let sts = aws_sdk_sts::Client::new(&conf);
        let identity = sts.get_caller_identity().send().await?;
        let account_id = identity
            .account()
            .unwrap_or("000000000000")
            .to_string();
        Ok(Self::new(&conf, &region, &account_id))
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}
