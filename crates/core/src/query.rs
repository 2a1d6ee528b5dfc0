use std::cmp::Ordering;

use crate::catalog::TargetCatalog;
use crate::ids::QueryId;
use crate::model::metric::{Metric, MetricDataQuery, MetricStat};

/// Aggregation period used when nothing else is configured: one day.
pub const DEFAULT_PERIOD_SECS: u32 = 86_400;

/// Turns listed metrics into `get-metric-data` queries for the statistics
/// the catalog asks for.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    catalog: &'a TargetCatalog,
    period: u32,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(catalog: &'a TargetCatalog, period: u32) -> Self {
        Self { catalog, period }
    }

    pub fn build(&self, metrics: &[Metric]) -> Vec<MetricDataQuery> {
        let mut kept = 0usize;
        let mut queries = Vec::new();
        for metric in metrics {
            let Some(stats) = self
                .catalog
                .statistics(&metric.namespace, &metric.metric_name)
            else {
                continue;
            };
            kept += 1;
            for stat in stats {
                queries.push(MetricDataQuery {
                    id: QueryId::for_metric_stat(metric, stat),
                    metric_stat: MetricStat {
                        metric: metric.clone(),
                        period: self.period,
                        stat: stat.clone(),
                    },
                });
            }
        }
        sort_queries(&mut queries);
        tracing::debug!(
            available = metrics.len(),
            kept,
            queries = queries.len(),
            "built metric data queries"
        );
        queries
    }
}

pub fn sort_queries(queries: &mut [MetricDataQuery]) {
    // Dimensions are compared through their JSON text, so render it once.
    queries.sort_by_cached_key(|q| {
        let m = &q.metric_stat.metric;
        (
            m.namespace.clone(),
            m.metric_name.clone(),
            m.dimensions_json(),
            q.metric_stat.stat.clone(),
        )
    });
}

/// Order of two queries by namespace, metric name, dimensions and statistic.
pub fn compare_queries(a: &MetricDataQuery, b: &MetricDataQuery) -> Ordering {
    let (ma, mb) = (&a.metric_stat.metric, &b.metric_stat.metric);
    ma.namespace
        .cmp(&mb.namespace)
        .then_with(|| ma.metric_name.cmp(&mb.metric_name))
        .then_with(|| ma.dimensions_json().cmp(&mb.dimensions_json()))
        .then_with(|| a.metric_stat.stat.cmp(&b.metric_stat.stat))
}
