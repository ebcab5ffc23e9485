//! Row filtering of the OTP table by day type, garage and recency.

use chrono::{Months, NaiveDate};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::{DayType, OtpRecord};

/// How far back the geographic view looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Recency {
    #[default]
    AllTime,
    LastMonths(u32),
}

impl Recency {
    pub const CHOICES: [Recency; 4] = [
        Recency::AllTime,
        Recency::LastMonths(9),
        Recency::LastMonths(12),
        Recency::LastMonths(18),
    ];

    /// Exclusive lower bound on `month_start`, counted back from `today`.
    pub fn min_month(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recency::AllTime => None,
            Recency::LastMonths(n) => today.checked_sub_months(Months::new(*n)),
        }
    }
}

impl fmt::Display for Recency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recency::AllTime => f.write_str("all time"),
            Recency::LastMonths(n) => write!(f, "last {n} months"),
        }
    }
}

impl FromStr for Recency {
    type Err = Error;

    /// Accepts `all` or one of the offered month windows (`9`, `12`, `18`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("all-time") {
            return Ok(Recency::AllTime);
        }
        s.parse::<u32>()
            .ok()
            .map(Recency::LastMonths)
            .filter(|r| Recency::CHOICES.contains(r))
            .ok_or_else(|| Error::InvalidValue {
                kind: "recency window",
                value: s.to_string(),
            })
    }
}

/// Explicit filter values handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    pub day_types: BTreeSet<DayType>,
    pub garages: BTreeSet<String>,
    pub min_month: Option<NaiveDate>,
}

impl FilterSpec {
    /// Builds a spec from raw UI selections. An empty day-type or garage
    /// selection means every known value, never none.
    pub fn from_selection(
        day_types: &[DayType],
        garages: &[String],
        known_garages: &[String],
        recency: Recency,
        today: NaiveDate,
    ) -> Self {
        let day_types = if day_types.is_empty() {
            DayType::ALL.into_iter().collect()
        } else {
            day_types.iter().copied().collect()
        };
        let garages = if garages.is_empty() {
            known_garages.iter().cloned().collect()
        } else {
            garages.iter().cloned().collect()
        };

        Self {
            day_types,
            garages,
            min_month: recency.min_month(today),
        }
    }

    pub fn matches(&self, record: &OtpRecord) -> bool {
        record.is_valid()
            && record
                .day_type
                .is_some_and(|d| self.day_types.contains(&d))
            && record
                .garage
                .as_ref()
                .is_some_and(|g| self.garages.contains(g))
            && self.min_month.is_none_or(|min| record.month_start > min)
    }
}

/// Rows with a positive OTP value that satisfy every condition of `spec`.
pub fn filter_records<'a>(records: &'a [OtpRecord], spec: &FilterSpec) -> Vec<&'a OtpRecord> {
    records.iter().filter(|r| spec.matches(r)).collect()
}
