//! Output formatting and persistence for derived tables.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::pipeline::GeoView;
use crate::pipeline::timeseries::TimeSeriesTable;
use csv::WriterBuilder;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug + ?Sized>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
///
/// The header comes from the first row's field names, so an empty slice
/// yields an empty file.
pub fn write_records<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV records");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Sibling of `path` holding the garage layer: `stops.csv` -> `stops_garages.csv`.
pub fn garages_path(path: &str) -> String {
    let path = Path::new(path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}_garages.{}", ext.to_string_lossy()),
        None => format!("{stem}_garages"),
    };
    path.with_file_name(file_name).to_string_lossy().into_owned()
}

/// Writes the stop layer to `path` and the garage layer to [`garages_path`].
/// Returns the garage file path.
pub fn write_geo_view(path: &str, view: &GeoView) -> Result<String> {
    write_records(path, &view.stops)?;
    let garages = garages_path(path);
    write_records(&garages, &view.garages)?;
    Ok(garages)
}

/// Writes a time-series table as CSV: a `month_start` column followed by one
/// column per series. Gaps are left as empty cells.
pub fn write_time_series(path: &str, table: &TimeSeriesTable) -> Result<()> {
    debug!(path, months = table.months.len(), series = table.series.len(), "Writing time series");

    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut header = vec!["month_start".to_string()];
    header.extend(table.series.iter().map(|s| s.name.clone()));
    writer.write_record(&header)?;

    for (i, month) in table.months.iter().enumerate() {
        let mut record = vec![month.format("%Y-%m-%d").to_string()];
        record.extend(table.series.iter().map(|s| match s.values.get(i).copied().flatten() {
            Some(v) => v.to_string(),
            None => String::new(),
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
