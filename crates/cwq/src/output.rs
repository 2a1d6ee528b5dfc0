use cwq_core::model::metric::MetricDataQuery;
use cwq_core::pivot::Cell;

pub fn render_queries(queries: &[MetricDataQuery], pretty: bool) -> anyhow::Result<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(queries)?
    } else {
        serde_json::to_string(queries)?
    };
    out.push('\n');
    Ok(out)
}

pub fn render_csv(rows: &[Vec<Cell>]) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(false)
        .from_writer(Vec::new());
    for row in rows {
        wtr.write_record(row.iter().map(ToString::to_string))?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv writer error: {e}"))?;
    Ok(String::from_utf8(data)?)
}
