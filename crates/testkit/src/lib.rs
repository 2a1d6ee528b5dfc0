use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{Value, json};

/// A `list-metrics` document with two catalogued metrics, one metric whose
/// name is not catalogued and one unknown namespace.
pub fn sample_list_metrics() -> Value {
    json!({
        "Metrics": [
            {
                "Namespace": "AWS/RDS",
                "MetricName": "CPUUtilization",
                "Dimensions": [{"Name": "DBInstanceIdentifier", "Value": "orders-db"}]
            },
            {
                "Namespace": "AWS/Foo",
                "MetricName": "Bar",
                "Dimensions": []
            },
            {
                "Namespace": "AWS/Kinesis",
                "MetricName": "IncomingBytes",
                "Dimensions": [{"Name": "StreamName", "Value": "events"}]
            },
            {
                "Namespace": "AWS/RDS",
                "MetricName": "FreeableMemory",
                "Dimensions": [{"Name": "DBInstanceIdentifier", "Value": "orders-db"}]
            }
        ]
    })
}

/// A `get-metric-data` result with `days` daily points per series, newest
/// first. Series `B` skips the oldest day.
pub fn sample_metric_data(days: i64) -> Value {
    let base = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let stamps: Vec<String> = (0..days)
        .rev()
        .map(|d| (base + Duration::days(d)).to_rfc3339_opts(SecondsFormat::Secs, false))
        .collect();
    let a_values: Vec<Value> = (0..days).rev().map(|d| json!(10 * (d + 1))).collect();
    let b_stamps = &stamps[..stamps.len().saturating_sub(1)];
    let b_values: Vec<Value> = (1..days).rev().map(|d| json!(d as f64 + 0.5)).collect();

    json!({
        "MetricDataResults": [
            {
                "Id": "ha",
                "Label": "A",
                "Timestamps": stamps,
                "Values": a_values,
                "StatusCode": "Complete"
            },
            {
                "Id": "hb",
                "Label": "B, with comma",
                "Timestamps": b_stamps,
                "Values": b_values,
                "StatusCode": "Complete"
            }
        ],
        "Messages": []
    })
}

pub fn with_status(mut doc: Value, index: usize, status: &str) -> Value {
    doc["MetricDataResults"][index]["StatusCode"] = json!(status);
    doc
}

pub fn write_fixture(dir: &Path, name: &str, doc: &Value) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(doc)?)?;
    Ok(path)
}
