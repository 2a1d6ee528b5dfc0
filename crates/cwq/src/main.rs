mod output;
mod telemetry;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use cwq_core::config::Config;
use cwq_core::model::metric::ListMetricsOutput;
use cwq_core::model::result::GetMetricDataOutput;
use cwq_core::pivot::{Layout, PivotTable};
use cwq_core::query::QueryBuilder;
use cwq_core::time::{Resolution, parse_period, period_duration};
use serde::de::DeserializeOwned;

use crate::output::{render_csv, render_queries};
use crate::telemetry::{LogFormat, init_cli_tracing};

#[derive(Parser, Debug)]
#[command(name = "cwq")]
#[command(about = "Build CloudWatch metric data queries and tabulate their results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Build a --metric-data-queries document from `aws cloudwatch list-metrics` output"
    )]
    CreateQuery {
        path: PathBuf,
        #[arg(long, help = "Aggregation period, e.g. 86400 or 1d")]
        period: Option<String>,
        #[arg(long, help = "Indent the JSON output")]
        pretty: bool,
    },
    #[command(about = "Convert `aws cloudwatch get-metric-data` output into CSV")]
    ToCsv {
        path: PathBuf,
        #[arg(long, help = "time-rows (default) or series-rows")]
        layout: Option<String>,
        #[arg(long, help = "Show only the date part of each timestamp")]
        date_only: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(LogFormat::from_env());
    let cfg = Config::load()?;

    let rendered = match cli.command {
        Commands::CreateQuery {
            path,
            period,
            pretty,
        } => create_query(&cfg, &path, period.as_deref(), pretty)?,
        Commands::ToCsv {
            path,
            layout,
            date_only,
        } => {
            let layout = match layout {
                Some(v) => v.parse::<Layout>()?,
                None => cfg.layout,
            };
            let resolution = if date_only {
                Resolution::Date
            } else {
                cfg.resolution
            };
            to_csv(&path, layout, resolution)?
        }
    };

    // Nothing reaches stdout until the whole document has been rendered.
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn create_query(
    cfg: &Config,
    path: &Path,
    period: Option<&str>,
    pretty: bool,
) -> anyhow::Result<String> {
    let period = match period {
        Some(v) => parse_period(v)?,
        None => cfg.period,
    };
    let doc: ListMetricsOutput = read_document(path)?;
    tracing::info!(
        metrics = doc.metrics.len(),
        period = %humantime::format_duration(period_duration(period)),
        "building metric data queries"
    );
    let queries = QueryBuilder::new(&cfg.targets, period).build(&doc.metrics);
    render_queries(&queries, pretty)
}

fn to_csv(path: &Path, layout: Layout, resolution: Resolution) -> anyhow::Result<String> {
    let doc: GetMetricDataOutput = read_document(path)?;
    tracing::info!(
        series = doc.metric_data_results.len(),
        %layout,
        %resolution,
        "tabulating metric data results"
    );
    let table = PivotTable::build(&doc.metric_data_results, &Local, resolution)?;
    render_csv(&table.rows(layout))
}

fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed parsing {}", path.display()))
}
