use serde::{Deserialize, Serialize};

use crate::catalog::Statistic;
use crate::ids::QueryId;

/// One name/value pair qualifying a metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// A metric as listed by `aws cloudwatch list-metrics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct Metric {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

impl Metric {
    /// Compact JSON of the dimension list; the third sort key of a query.
    pub fn dimensions_json(&self) -> String {
        // Serializing a Vec of plain string structs cannot fail.
        serde_json::to_string(&self.dimensions).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ListMetricsOutput {
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MetricStat {
    pub metric: Metric,
    pub period: u32,
    pub stat: Statistic,
}

/// One entry of the `--metric-data-queries` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataQuery {
    pub id: QueryId,
    pub metric_stat: MetricStat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_metrics_document() {
        let raw = r#"{
            "Metrics": [
                {
                    "Namespace": "AWS/RDS",
                    "MetricName": "CPUUtilization",
                    "Dimensions": [{"Name": "DBInstanceIdentifier", "Value": "db-1"}]
                },
                {"Namespace": "AWS/Foo", "MetricName": "Bar"}
            ]
        }"#;
        let doc: ListMetricsOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.metrics.len(), 2);
        assert_eq!(doc.metrics[0].dimensions[0].value, "db-1");
        assert!(doc.metrics[1].dimensions.is_empty());
    }

    #[test]
    fn rejects_document_without_metrics_key() {
        assert!(serde_json::from_str::<ListMetricsOutput>(r#"{"NextToken": "x"}"#).is_err());
    }

    #[test]
    fn dimensions_json_is_compact_and_ordered() {
        let metric = Metric {
            namespace: "AWS/ECS".into(),
            metric_name: "CPUUtilization".into(),
            dimensions: vec![
                Dimension {
                    name: "ServiceName".into(),
                    value: "api".into(),
                },
                Dimension {
                    name: "ClusterName".into(),
                    value: "prod".into(),
                },
            ],
        };
        assert_eq!(
            metric.dimensions_json(),
            r#"[{"Name":"ServiceName","Value":"api"},{"Name":"ClusterName","Value":"prod"}]"#
        );
    }
}
