use std::collections::BTreeMap;

use crate::model::OtpRecord;
use crate::pipeline::utility::weighted_mean;

/// Collapses filtered OTP rows to one value per route.
///
/// Each row counts with its day-type weight (weekday 5, weekend 1), so the
/// result approximates an average over service days rather than over rows.
/// Rows without a route, day type or OTP value are skipped, as are routes
/// whose total weight is zero.
pub fn route_otp(rows: &[&OtpRecord]) -> BTreeMap<String, f64> {
    let mut by_route: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();

    for row in rows {
        let (Some(route), Some(day_type), Some(otp)) =
            (row.route.as_deref(), row.day_type, row.on_time_percent)
        else {
            continue;
        };
        by_route
            .entry(route)
            .or_default()
            .push((otp, day_type.weight()));
    }

    by_route
        .into_iter()
        .filter_map(|(route, pairs)| weighted_mean(&pairs).map(|otp| (route.to_string(), otp)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DayType;
    use chrono::NaiveDate;

    fn record(route: &str, day_type: DayType, otp: f64) -> OtpRecord {
        OtpRecord {
            route: Some(route.into()),
            garage: Some("Ross".into()),
            day_type: Some(day_type),
            month_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            on_time_percent: Some(otp),
        }
    }

    #[test]
    fn test_weekday_only_route_keeps_value() {
        let records = vec![
            record("54", DayType::Weekday, 0.73),
            record("54", DayType::Weekday, 0.73),
            record("54", DayType::Weekday, 0.73),
        ];
        let rows: Vec<&OtpRecord> = records.iter().collect();

        let out = route_otp(&rows);
        assert_eq!(out["54"], 0.73);
    }

    #[test]
    fn test_weekday_weighted_five_to_one() {
        let records = vec![
            record("61C", DayType::Weekday, 0.8),
            record("61C", DayType::Saturday, 0.2),
            record("P1", DayType::Sunday, 0.9),
        ];
        let rows: Vec<&OtpRecord> = records.iter().collect();

        let out = route_otp(&rows);
        assert_eq!(out.len(), 2);
        assert!((out["61C"] - 0.7).abs() < 1e-12);
        assert!((out["P1"] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_rows_without_route_skipped() {
        let mut orphan = record("x", DayType::Weekday, 0.5);
        orphan.route = None;
        let out = route_otp(&[&orphan]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(route_otp(&[]).is_empty());
    }
}
