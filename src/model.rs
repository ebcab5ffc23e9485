//! Raw record types for the two source datasets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Service calendar bucket of an OTP record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    #[serde(rename = "WEEKDAY")]
    Weekday,
    #[serde(rename = "SAT.")]
    Saturday,
    #[serde(rename = "SUN.")]
    Sunday,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Weekday, DayType::Saturday, DayType::Sunday];

    /// Label used by the source dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "WEEKDAY",
            DayType::Saturday => "SAT.",
            DayType::Sunday => "SUN.",
        }
    }

    /// Approximate number of service days per week this bucket stands for.
    pub fn weight(&self) -> f64 {
        match self {
            DayType::Weekday => 5.0,
            DayType::Saturday | DayType::Sunday => 1.0,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = Error;

    /// Accepts the dataset labels as well as the shorter CLI spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEEKDAY" => Ok(DayType::Weekday),
            "SAT." | "SAT" | "SATURDAY" => Ok(DayType::Saturday),
            "SUN." | "SUN" | "SUNDAY" => Ok(DayType::Sunday),
            _ => Err(Error::InvalidValue {
                kind: "day type",
                value: s.to_string(),
            }),
        }
    }
}

/// One row of the route-level on-time-performance dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtpRecord {
    pub route: Option<String>,
    pub garage: Option<String>,
    pub day_type: Option<DayType>,
    pub month_start: NaiveDate,
    pub on_time_percent: Option<f64>,
}

impl OtpRecord {
    /// True when `on_time_percent` is present, finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.on_time_percent.is_some_and(|p| p.is_finite() && p > 0.0)
    }
}

/// One row of the stop-location dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRecord {
    pub stop_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma-delimited list of route identifiers serving the stop.
    pub routes_ser: Option<String>,
}

/// A garage marker drawn on the map next to the stop layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarageLocation {
    pub garage: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_type_weights() {
        assert_eq!(DayType::Weekday.weight(), 5.0);
        assert_eq!(DayType::Saturday.weight(), 1.0);
        assert_eq!(DayType::Sunday.weight(), 1.0);
    }

    #[test]
    fn test_day_type_from_str() {
        assert_eq!("WEEKDAY".parse::<DayType>().unwrap(), DayType::Weekday);
        assert_eq!("sat".parse::<DayType>().unwrap(), DayType::Saturday);
        assert_eq!("SUN.".parse::<DayType>().unwrap(), DayType::Sunday);
        assert!("HOLIDAY".parse::<DayType>().is_err());
    }

    #[test]
    fn test_is_valid() {
        let mut rec = OtpRecord {
            route: Some("61C".into()),
            garage: Some("Ross".into()),
            day_type: Some(DayType::Weekday),
            month_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            on_time_percent: Some(0.7),
        };
        assert!(rec.is_valid());

        rec.on_time_percent = Some(0.0);
        assert!(!rec.is_valid());

        rec.on_time_percent = Some(f64::NAN);
        assert!(!rec.is_valid());

        rec.on_time_percent = Some(f64::INFINITY);
        assert!(!rec.is_valid());

        rec.on_time_percent = None;
        assert!(!rec.is_valid());
    }
}
