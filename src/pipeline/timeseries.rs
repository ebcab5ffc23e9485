//! Monthly OTP series per category value, for the line chart.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::OtpRecord;
use crate::pipeline::utility::mean;

pub const MAX_SELECTED_ROUTES: usize = 5;

/// Column the time series is split by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    Routes,
    DayTypes,
    Garages,
}

impl Perspective {
    /// Value of this perspective's column for `record`, if present.
    pub fn category<'a>(&self, record: &'a OtpRecord) -> Option<&'a str> {
        match self {
            Perspective::Routes => record.route.as_deref(),
            Perspective::DayTypes => record.day_type.map(|d| d.as_str()),
            Perspective::Garages => record.garage.as_deref(),
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Perspective::Routes => "routes",
            Perspective::DayTypes => "day-types",
            Perspective::Garages => "garages",
        })
    }
}

impl FromStr for Perspective {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "routes" | "route" => Ok(Perspective::Routes),
            "day-types" | "day-type" | "weekday/weekends" => Ok(Perspective::DayTypes),
            "garages" | "garage" => Ok(Perspective::Garages),
            _ => Err(Error::InvalidValue {
                kind: "perspective",
                value: s.to_string(),
            }),
        }
    }
}

/// Between one and [`MAX_SELECTED_ROUTES`] distinct routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSelection(Vec<String>);

impl RouteSelection {
    pub fn new(routes: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        let routes: Vec<String> = routes
            .into_iter()
            .filter(|r| seen.insert(r.clone()))
            .collect();

        if routes.is_empty() || routes.len() > MAX_SELECTED_ROUTES {
            return Err(Error::SelectionOutOfRange {
                selected: routes.len(),
            });
        }
        Ok(Self(routes))
    }

    pub fn routes(&self) -> &[String] {
        &self.0
    }
}

/// Candidate values of `perspective` among valid rows, in first-seen order.
/// Missing values are never candidates.
pub fn distinct_values(records: &[OtpRecord], perspective: Perspective) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| r.is_valid())
        .filter_map(|r| perspective.category(r))
        .filter(|v| seen.insert(*v))
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// Aligned with [`TimeSeriesTable::months`]; `None` marks a gap.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeSeriesTable {
    pub months: Vec<NaiveDate>,
    pub series: Vec<Series>,
}

impl TimeSeriesTable {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Builds one monthly mean-OTP series per entry of `values`, grouping valid
/// rows whose `perspective` column equals the value.
///
/// All series share the union of their months; a month absent for one value
/// is `None` in that series.
pub fn time_series(
    records: &[OtpRecord],
    perspective: Perspective,
    values: &[String],
) -> TimeSeriesTable {
    let per_value: Vec<(&str, BTreeMap<NaiveDate, f64>)> = values
        .iter()
        .map(|value| {
            let mut by_month: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
            for record in records.iter().filter(|r| r.is_valid()) {
                if perspective.category(record) != Some(value.as_str()) {
                    continue;
                }
                if let Some(otp) = record.on_time_percent {
                    by_month.entry(record.month_start).or_default().push(otp);
                }
            }
            let means = by_month
                .into_iter()
                .filter_map(|(month, vals)| mean(&vals).map(|m| (month, m)))
                .collect();
            (value.as_str(), means)
        })
        .collect();

    let months: Vec<NaiveDate> = per_value
        .iter()
        .flat_map(|(_, means)| means.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = per_value
        .into_iter()
        .map(|(name, means)| Series {
            name: name.to_string(),
            values: months.iter().map(|m| means.get(m).copied()).collect(),
        })
        .collect();

    TimeSeriesTable { months, series }
}
