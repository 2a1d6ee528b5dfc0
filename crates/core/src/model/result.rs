use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusCode {
    Complete,
    InternalError,
    PartialData,
    Forbidden,
    #[serde(other)]
    Unknown,
}

impl StatusCode {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Complete => "Complete",
            Self::InternalError => "InternalError",
            Self::PartialData => "PartialData",
            Self::Forbidden => "Forbidden",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// One series of `aws cloudwatch get-metric-data` output. Timestamps and
/// values are parallel and newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub status_code: StatusCode,
    pub timestamps: Vec<String>,
    pub values: Vec<Number>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct GetMetricDataOutput {
    pub metric_data_results: Vec<MetricDataResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_metric_data_document() {
        let raw = r#"{
            "MetricDataResults": [{
                "Id": "h0",
                "Label": "CPUUtilization",
                "Timestamps": ["2023-06-02T00:00:00+00:00", "2023-06-01T00:00:00+00:00"],
                "Values": [20.5, 10],
                "StatusCode": "Complete"
            }],
            "Messages": []
        }"#;
        let doc: GetMetricDataOutput = serde_json::from_str(raw).unwrap();
        let series = &doc.metric_data_results[0];
        assert!(series.status_code.is_complete());
        assert_eq!(series.values[0].to_string(), "20.5");
        assert_eq!(series.values[1].to_string(), "10");
    }

    #[test]
    fn unknown_status_is_not_complete() {
        let status: StatusCode = serde_json::from_str(r#""Throttled""#).unwrap();
        assert_eq!(status, StatusCode::Unknown);
        assert!(!status.is_complete());
        assert_eq!(StatusCode::PartialData.to_string(), "PartialData");
    }

    #[test]
    fn missing_values_array_is_rejected() {
        let raw = r#"{"MetricDataResults": [{
            "Label": "x", "StatusCode": "Complete", "Timestamps": []
        }]}"#;
        assert!(serde_json::from_str::<GetMetricDataOutput>(raw).is_err());
    }
}
