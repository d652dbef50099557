// Fixed metric vocabulary per resource kind. Every latest/bucketed record for
// a kind carries exactly these keys, data or no data. The semantic decides
// both the fetch statistic and the in-bucket aggregation, so the two cannot
// drift apart: counts are fetched with Sum and summed, gauges are fetched
// with Average and averaged.

use aws_sdk_cloudwatch::types::StandardUnit;

use crate::models::ServiceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    Gauge,
    Count,
}

impl Semantic {
    pub fn statistic(&self) -> &'static str {
        match self {
            Semantic::Gauge => "Average",
            Semantic::Count => "Sum",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSpec {
    /// CloudWatch metric name.
    pub name: &'static str,
    /// snake_case wire key.
    pub key: &'static str,
    pub unit: StandardUnit,
    pub semantic: Semantic,
}

const EC2_METRICS: &[MetricSpec] = &[
    MetricSpec {
        name: "CPUUtilization",
        key: "cpu_utilization",
        unit: StandardUnit::Percent,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "NetworkIn",
        key: "network_in",
        unit: StandardUnit::Bytes,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "NetworkOut",
        key: "network_out",
        unit: StandardUnit::Bytes,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "DiskReadOps",
        key: "disk_read_ops",
        unit: StandardUnit::Count,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "DiskWriteOps",
        key: "disk_write_ops",
        unit: StandardUnit::Count,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "StatusCheckFailed",
        key: "status_check_failed",
        unit: StandardUnit::Count,
        semantic: Semantic::Gauge,
    },
];

const RDS_METRICS: &[MetricSpec] = &[
    MetricSpec {
        name: "CPUUtilization",
        key: "cpu_utilization",
        unit: StandardUnit::Percent,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "FreeStorageSpace",
        key: "free_storage_space",
        unit: StandardUnit::Bytes,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "DatabaseConnections",
        key: "database_connections",
        unit: StandardUnit::Count,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "FreeableMemory",
        key: "freeable_memory",
        unit: StandardUnit::Bytes,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "ReadIOPS",
        key: "read_iops",
        unit: StandardUnit::CountSecond,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "WriteIOPS",
        key: "write_iops",
        unit: StandardUnit::CountSecond,
        semantic: Semantic::Gauge,
    },
];

const ALB_METRICS: &[MetricSpec] = &[
    MetricSpec {
        name: "RequestCount",
        key: "request_count",
        unit: StandardUnit::Count,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "TargetResponseTime",
        key: "target_response_time",
        unit: StandardUnit::Seconds,
        semantic: Semantic::Gauge,
    },
    MetricSpec {
        name: "HTTPCode_Target_4XX_Count",
        key: "http_code_target_4xx_count",
        unit: StandardUnit::Count,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "HTTPCode_Target_5XX_Count",
        key: "http_code_target_5xx_count",
        unit: StandardUnit::Count,
        semantic: Semantic::Count,
    },
    MetricSpec {
        name: "HealthyHostCount",
        key: "healthy_host_count",
        unit: StandardUnit::Count,
        semantic: Semantic::Gauge,
    },
];

pub fn specs_for(kind: ServiceKind) -> &'static [MetricSpec] {
    match kind {
        ServiceKind::Ec2 => EC2_METRICS,
        ServiceKind::Rds => RDS_METRICS,
        ServiceKind::Alb => ALB_METRICS,
    }
}

pub fn namespace(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Ec2 => "AWS/EC2",
        ServiceKind::Rds => "AWS/RDS",
        ServiceKind::Alb => "AWS/ApplicationELB",
    }
}

pub fn dimension_name(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Ec2 => "InstanceId",
        ServiceKind::Rds => "DBInstanceIdentifier",
        ServiceKind::Alb => "LoadBalancer",
    }
}

/// The metric the state classifier reads for this kind.
pub fn primary_metric(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Ec2 | ServiceKind::Rds => "cpu_utilization",
        ServiceKind::Alb => "target_response_time",
    }
}
