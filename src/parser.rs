//! CSV parsers for the OTP and stop datasets.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::model::{DayType, OtpRecord, StopRecord};

#[derive(Debug, Deserialize)]
struct OtpRow {
    route: Option<String>,
    current_garage: Option<String>,
    day_type: Option<DayType>,
    #[serde(deserialize_with = "deserialize_month")]
    month_start: NaiveDate,
    #[serde(deserialize_with = "csv::invalid_option")]
    on_time_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StopRow {
    stop_name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    routes_ser: Option<String>,
}

/// Accepts either a bare date or a timestamp; only the date part is kept.
fn deserialize_month<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_month(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid month_start '{raw}'")))
}

fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Decodes the route-level OTP dataset from delimited text with a header row.
///
/// Columns other than `route`, `current_garage`, `day_type`, `month_start` and
/// `on_time_percent` are ignored. Unparseable percentages become `None`.
///
/// # Errors
///
/// Returns an error if a required column is missing, a `month_start` cannot be
/// parsed, or a `day_type` is not one of the known labels.
pub fn parse_otp(bytes: &[u8]) -> Result<Vec<OtpRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let mut records = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let row: OtpRow = result.with_context(|| format!("OTP dataset row {}", line + 1))?;
        records.push(OtpRecord {
            route: row.route,
            garage: row.current_garage,
            day_type: row.day_type,
            month_start: row.month_start,
            on_time_percent: row.on_time_percent,
        });
    }

    debug!(rows = records.len(), "Parsed OTP dataset");
    Ok(records)
}

/// Decodes the stop-location dataset from delimited text with a header row.
///
/// # Errors
///
/// Returns an error if a required column is missing.
pub fn parse_stops(bytes: &[u8]) -> Result<Vec<StopRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let mut records = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let row: StopRow = result.with_context(|| format!("stop dataset row {}", line + 1))?;
        records.push(StopRecord {
            stop_name: row.stop_name,
            latitude: row.latitude,
            longitude: row.longitude,
            routes_ser: row.routes_ser,
        });
    }

    debug!(rows = records.len(), "Parsed stop dataset");
    Ok(records)
}
