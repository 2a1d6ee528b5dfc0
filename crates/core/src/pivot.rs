use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{CwqError, Result};
use crate::model::result::MetricDataResult;
use crate::time::{Resolution, normalize_timestamp};

pub const TIME_HEADER: &str = "Time";

/// Which axis runs down the rendered table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One row per timestamp, one column per series.
    #[default]
    TimeRows,
    /// One row per series, one column per timestamp.
    SeriesRows,
}

impl FromStr for Layout {
    type Err = CwqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "time-rows" | "time_rows" | "time" => Ok(Self::TimeRows),
            "series-rows" | "series_rows" | "series" => Ok(Self::SeriesRows),
            _ => Err(CwqError::Parse(format!("unknown layout: {s}"))),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeRows => f.write_str("time-rows"),
            Self::SeriesRows => f.write_str("series-rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Value(Number),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Value(n) => write!(f, "{n}"),
            Self::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub label: String,
    /// Aligned with `PivotTable::time_axis`; `None` where the series has no point.
    pub values: Vec<Option<Number>>,
}

/// Series values realigned onto the union of all their timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub time_axis: Vec<String>,
    pub series: Vec<SeriesRow>,
}

impl PivotTable {
    pub fn build<Tz>(results: &[MetricDataResult], tz: &Tz, resolution: Resolution) -> Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        for result in results {
            if !result.status_code.is_complete() {
                return Err(CwqError::IncompleteSeries {
                    label: result.label.clone(),
                    status: result.status_code.to_string(),
                });
            }
            if result.timestamps.len() != result.values.len() {
                return Err(CwqError::InvalidInput(format!(
                    "series \"{}\" has {} timestamps but {} values",
                    result.label,
                    result.timestamps.len(),
                    result.values.len()
                )));
            }
        }

        let mut axis = BTreeSet::new();
        let mut by_series = Vec::with_capacity(results.len());
        for result in results {
            let mut by_time = HashMap::with_capacity(result.timestamps.len());
            // Input is newest first; walk oldest first so the latest point
            // wins when two collapse onto the same display key.
            for (raw, value) in result.timestamps.iter().zip(&result.values).rev() {
                let key = normalize_timestamp(raw, tz, resolution).map_err(|e| {
                    CwqError::InvalidInput(format!("series \"{}\": {e}", result.label))
                })?;
                axis.insert(key.clone());
                by_time.insert(key, value.clone());
            }
            by_series.push((result.label.clone(), by_time));
        }

        let time_axis: Vec<String> = axis.into_iter().collect();
        let series = by_series
            .into_iter()
            .map(|(label, by_time)| SeriesRow {
                values: time_axis.iter().map(|t| by_time.get(t).cloned()).collect(),
                label,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            series = series.len(),
            timestamps = time_axis.len(),
            "pivoted metric data results"
        );
        Ok(Self { time_axis, series })
    }

    /// Header row followed by one row per series.
    pub fn series_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows = Vec::with_capacity(self.series.len() + 1);
        rows.push(
            std::iter::once(Cell::Text(TIME_HEADER.to_string()))
                .chain(self.time_axis.iter().cloned().map(Cell::Text))
                .collect(),
        );
        for s in &self.series {
            rows.push(
                std::iter::once(Cell::Text(s.label.clone()))
                    .chain(s.values.iter().map(|v| match v {
                        Some(n) => Cell::Value(n.clone()),
                        None => Cell::Empty,
                    }))
                    .collect(),
            );
        }
        rows
    }

    pub fn rows(&self, layout: Layout) -> Vec<Vec<Cell>> {
        let rows = self.series_rows();
        match layout {
            Layout::SeriesRows => rows,
            Layout::TimeRows => transpose(&rows),
        }
    }
}

/// Swaps rows and columns of a rectangular table.
pub fn transpose<T: Clone>(rows: &[Vec<T>]) -> Vec<Vec<T>> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| rows.iter().map(|row| row[col].clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::model::result::StatusCode;

    const T1: &str = "2023-06-01T00:00:00Z";
    const T2: &str = "2023-06-02T00:00:00Z";

    fn series(label: &str, ts: &[&str], values: &[i64]) -> MetricDataResult {
        MetricDataResult {
            id: None,
            label: label.into(),
            status_code: StatusCode::Complete,
            timestamps: ts.iter().map(|t| t.to_string()).collect(),
            values: values.iter().map(|v| Number::from(*v)).collect(),
        }
    }

    fn text(rows: &[Vec<Cell>]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn pivots_reverse_chronological_series() {
        let results = vec![
            series("A", &[T2, T1], &[20, 10]),
            series("B", &[T2], &[99]),
        ];
        let table = PivotTable::build(&results, &Utc, Resolution::Seconds).unwrap();
        assert_eq!(
            table.time_axis,
            vec!["2023-06-01 00:00:00", "2023-06-02 00:00:00"]
        );
        assert_eq!(
            table.series[0].values,
            vec![Some(Number::from(10)), Some(Number::from(20))]
        );
        assert_eq!(table.series[1].values, vec![None, Some(Number::from(99))]);

        assert_eq!(
            text(&table.rows(Layout::SeriesRows)),
            vec![
                vec!["Time", "2023-06-01 00:00:00", "2023-06-02 00:00:00"],
                vec!["A", "10", "20"],
                vec!["B", "", "99"],
            ]
        );
        assert_eq!(
            text(&table.rows(Layout::TimeRows)),
            vec![
                vec!["Time", "A", "B"],
                vec!["2023-06-01 00:00:00", "10", ""],
                vec!["2023-06-02 00:00:00", "20", "99"],
            ]
        );
    }

    #[test]
    fn incomplete_series_is_rejected_by_label() {
        let mut partial = series("B", &[T1], &[1]);
        partial.status_code = StatusCode::PartialData;
        let results = vec![series("A", &[T1], &[1]), partial];
        let err = PivotTable::build(&results, &Utc, Resolution::Seconds).unwrap_err();
        match err {
            CwqError::IncompleteSeries { label, status } => {
                assert_eq!(label, "B");
                assert_eq!(status, "PartialData");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut broken = series("A", &[T2, T1], &[1, 2]);
        broken.values.pop();
        let err = PivotTable::build(&[broken], &Utc, Resolution::Seconds).unwrap_err();
        assert!(matches!(err, CwqError::InvalidInput(_)));
    }

    #[test]
    fn bad_timestamp_names_series() {
        let err = PivotTable::build(&[series("A", &["nope"], &[1])], &Utc, Resolution::Seconds)
            .unwrap_err();
        assert!(err.to_string().contains("\"A\""));
    }

    #[test]
    fn axis_follows_target_zone() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let table =
            PivotTable::build(&[series("A", &["2023-06-01T20:00:00Z"], &[5])], &jst, Resolution::Seconds)
                .unwrap();
        assert_eq!(table.time_axis, vec!["2023-06-02 05:00:00"]);
    }

    #[test]
    fn date_resolution_keeps_latest_point_of_day() {
        let results = vec![series(
            "A",
            &["2023-06-01T18:00:00Z", "2023-06-01T06:00:00Z"],
            &[2, 1],
        )];
        let table = PivotTable::build(&results, &Utc, Resolution::Date).unwrap();
        assert_eq!(table.time_axis, vec!["2023-06-01"]);
        assert_eq!(table.series[0].values, vec![Some(Number::from(2))]);
    }

    #[test]
    fn every_series_spans_the_full_axis() {
        let results = vec![
            series("A", &["2023-06-03T00:00:00Z", T1], &[3, 1]),
            series("B", &[T2], &[2]),
            series("C", &[], &[]),
        ];
        let table = PivotTable::build(&results, &Utc, Resolution::Seconds).unwrap();
        assert_eq!(table.time_axis.len(), 3);
        for row in &table.series {
            assert_eq!(row.values.len(), table.time_axis.len());
        }
        assert!(table.series[2].values.iter().all(Option::is_none));
    }

    #[test]
    fn empty_results_render_header_only() {
        let table = PivotTable::build(&[], &Utc, Resolution::Seconds).unwrap();
        assert_eq!(text(&table.rows(Layout::TimeRows)), vec![vec!["Time"]]);
    }

    #[test]
    fn transpose_twice_is_identity() {
        let results = vec![
            series("A", &[T2, T1], &[20, 10]),
            series("B", &[T2], &[99]),
        ];
        let table = PivotTable::build(&results, &Utc, Resolution::Seconds).unwrap();
        let rows = table.rows(Layout::TimeRows);
        assert_eq!(transpose(&transpose(&rows)), rows);
        assert_eq!(transpose(&rows), table.rows(Layout::SeriesRows));
    }

    #[test]
    fn layout_from_str() {
        assert_eq!("series-rows".parse::<Layout>().unwrap(), Layout::SeriesRows);
        assert_eq!("TIME".parse::<Layout>().unwrap(), Layout::TimeRows);
        assert!("diagonal".parse::<Layout>().is_err());
    }
}
