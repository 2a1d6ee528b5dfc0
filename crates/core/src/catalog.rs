use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CwqError, Result};

/// CloudWatch statistic name, e.g. `Sum`, `Average` or `p99`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistic(String);

impl Statistic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type NamespaceTargets = BTreeMap<String, Vec<Statistic>>;

const MIN_MAX_AVG: &[&str] = &["Minimum", "Maximum", "Average"];
const SUM: &[&str] = &["Sum"];
const AVG: &[&str] = &["Average"];

const DEFAULT_TARGETS: &[(&str, &str, &[&str])] = &[
    ("AWS/DynamoDB", "ConsumedReadCapacityUnits", SUM),
    ("AWS/DynamoDB", "ConsumedWriteCapacityUnits", SUM),
    ("AWS/ECS", "CPUUtilization", MIN_MAX_AVG),
    ("AWS/ECS", "MemoryUtilization", MIN_MAX_AVG),
    ("AWS/Firehose", "DataReadFromKinesisStream.Bytes", SUM),
    ("AWS/Firehose", "SucceedConversion.Bytes", SUM),
    ("AWS/Glue", "ResourceUsage", MIN_MAX_AVG),
    ("AWS/IoT", "Connect.Success", SUM),
    ("AWS/IoT", "PublishIn.Success", SUM),
    ("AWS/IoT", "PublishOut.Success", SUM),
    ("AWS/Kinesis", "IncomingBytes", SUM),
    ("AWS/MWAA", "CPUUtilization", MIN_MAX_AVG),
    ("AWS/MWAA", "MemoryUtilization", MIN_MAX_AVG),
    ("AWS/RDS", "CPUUtilization", MIN_MAX_AVG),
    ("AWS/Redshift", "CPUUtilization", MIN_MAX_AVG),
    ("ECS/ContainerInsights", "CpuReserved", AVG),
    ("ECS/ContainerInsights", "MemoryReserved", AVG),
    ("ECS/ContainerInsights", "RunningTaskCount", AVG),
];

/// Metrics worth querying: namespace -> metric name -> statistics, in the
/// order they were declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetCatalog {
    targets: BTreeMap<String, NamespaceTargets>,
}

impl Default for TargetCatalog {
    fn default() -> Self {
        let mut targets: BTreeMap<String, NamespaceTargets> = BTreeMap::new();
        for (namespace, metric_name, stats) in DEFAULT_TARGETS {
            targets.entry(namespace.to_string()).or_default().insert(
                metric_name.to_string(),
                stats.iter().map(|s| Statistic::new(*s)).collect(),
            );
        }
        Self { targets }
    }
}

impl TargetCatalog {
    pub fn from_targets(targets: BTreeMap<String, NamespaceTargets>) -> Result<Self> {
        for (namespace, metrics) in &targets {
            for (metric_name, stats) in metrics {
                if stats.is_empty() {
                    return Err(CwqError::Config(format!(
                        "no statistics listed for {namespace}/{metric_name}"
                    )));
                }
                for (i, stat) in stats.iter().enumerate() {
                    if stat.as_str().is_empty() {
                        return Err(CwqError::Config(format!(
                            "empty statistic for {namespace}/{metric_name}"
                        )));
                    }
                    if stats[..i].contains(stat) {
                        return Err(CwqError::Config(format!(
                            "duplicate statistic {stat} for {namespace}/{metric_name}"
                        )));
                    }
                }
            }
        }
        Ok(Self { targets })
    }

    pub fn statistics(&self, namespace: &str, metric_name: &str) -> Option<&[Statistic]> {
        self.targets
            .get(namespace)?
            .get(metric_name)
            .map(Vec::as_slice)
    }

    pub fn contains(&self, namespace: &str, metric_name: &str) -> bool {
        self.statistics(namespace, metric_name).is_some()
    }

    /// Number of (namespace, metric name) pairs.
    pub fn len(&self) -> usize {
        self.targets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
