//! Text and JSON rendering of datasets and charts for the terminal.

use rain_cache::CacheKey;
use rain_chart::StackedChart;
use rain_core::RainfallDataset;
use serde_json::json;
use std::io::Write;

/// Shown by `list` when nothing has been saved.
pub const NO_SAVED_DATA: &str = "No saved analysed rainfall data";

pub fn write_dataset(out: &mut impl Write, dataset: &RainfallDataset) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} ({})",
        dataset.source_name().unwrap_or("<unsaved>"),
        dataset.date_range_label()
    )?;
    writeln!(
        out,
        "{:>8} {:>10} {:>10} {:>10} {:>5}",
        "month", "min", "max", "total", "days"
    )?;
    for summary in dataset.summaries() {
        writeln!(
            out,
            "{:>8} {:>10.1} {:>10.1} {:>10.1} {:>5}",
            summary.label(),
            summary.min(),
            summary.max(),
            summary.total(),
            summary.days()
        )?;
    }
    writeln!(
        out,
        "{} months, {} days, {:.1} millimeters in total",
        dataset.len(),
        dataset.record_count(),
        dataset.total_rainfall()
    )?;
    Ok(())
}

pub fn write_dataset_json(out: &mut impl Write, dataset: &RainfallDataset) -> anyhow::Result<()> {
    let value = json!({
        "source_name": dataset.source_name(),
        "date_range": dataset.date_range_label(),
        "summaries": dataset.summaries(),
    });
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

/// One line per stacked segment, using the hover text of each point.
pub fn write_chart(out: &mut impl Write, chart: &StackedChart) -> anyhow::Result<()> {
    writeln!(out, "{}", chart.title)?;
    for (index, category) in chart.categories.iter().enumerate() {
        writeln!(out, "{category}")?;
        for series in &chart.series {
            if let Some(point) = series.points.get(index) {
                writeln!(out, "  {:<16} +{:<10.1} {}", series.name, point.value, point)?;
            }
        }
    }
    Ok(())
}

pub fn write_chart_json(out: &mut impl Write, chart: &StackedChart) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, chart)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_keys(out: &mut impl Write, keys: &[CacheKey]) -> anyhow::Result<()> {
    if keys.is_empty() {
        writeln!(out, "{NO_SAVED_DATA}")?;
    }
    for key in keys {
        writeln!(out, "{key}")?;
    }
    Ok(())
}
