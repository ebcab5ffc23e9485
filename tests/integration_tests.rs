use chrono::NaiveDate;
use otp_dashboard::config::DashboardConfig;
use otp_dashboard::dataset::Datasets;
use otp_dashboard::error::Error;
use otp_dashboard::fetch::BasicClient;
use otp_dashboard::model::DayType;
use otp_dashboard::parser::{parse_otp, parse_stops};
use otp_dashboard::pipeline::filter::{FilterSpec, Recency};
use otp_dashboard::pipeline::snapshot::RouteSnapshot;
use otp_dashboard::pipeline::stop_otp_table;
use otp_dashboard::pipeline::timeseries::{
    Perspective, RouteSelection, distinct_values, time_series,
};

fn fixtures() -> Datasets {
    let otp = parse_otp(include_bytes!("fixtures/otp.csv")).expect("Failed to parse OTP fixture");
    let stops =
        parse_stops(include_bytes!("fixtures/stops.csv")).expect("Failed to parse stop fixture");
    Datasets { otp, stops }
}

fn month(m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, m, 1).unwrap()
}

fn spec(day_types: &[DayType], garages: &[String]) -> FilterSpec {
    FilterSpec::from_selection(
        day_types,
        garages,
        &DashboardConfig::default().garages,
        Recency::AllTime,
        month(6),
    )
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_geo_pipeline_all_filters() {
    let data = fixtures();
    let table = stop_otp_table(&data.otp, &data.stops, &spec(&[], &[]));

    let names: Vec<_> = table.iter().map(|s| s.stop_name.as_str()).collect();
    assert_eq!(names, vec!["Forbes Ave", "Liberty Ave"]);

    // A = 0.9, B = (0.8*5 + 0.2) / 6 = 0.7
    assert!(approx(table[0].on_time_percent, 0.8));
    assert_eq!(table[0].latitude, 40.44);
    assert!(approx(table[1].on_time_percent, 0.5));
}

#[test]
fn test_geo_pipeline_weekday_only() {
    let data = fixtures();
    let table = stop_otp_table(&data.otp, &data.stops, &spec(&[DayType::Weekday], &[]));

    assert_eq!(table.len(), 2);
    assert!(approx(table[0].on_time_percent, 0.85));
}

#[test]
fn test_geo_pipeline_single_garage() {
    let data = fixtures();
    let table = stop_otp_table(&data.otp, &data.stops, &spec(&[], &["Collier".to_string()]));

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].stop_name, "Forbes Ave");
    assert!(approx(table[0].on_time_percent, 0.7));
}

#[test]
fn test_geo_pipeline_recent_window_empty() {
    let data = fixtures();
    let spec = FilterSpec::from_selection(
        &[],
        &[],
        &DashboardConfig::default().garages,
        Recency::LastMonths(9),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    );
    assert!(stop_otp_table(&data.otp, &data.stops, &spec).is_empty());
}

#[test]
fn test_day_type_time_series() {
    let data = fixtures();
    let values = distinct_values(&data.otp, Perspective::DayTypes);
    assert_eq!(values, vec!["WEEKDAY".to_string(), "SAT.".to_string()]);

    let table = time_series(&data.otp, Perspective::DayTypes, &values);
    assert_eq!(table.months, vec![month(1), month(2), month(3)]);

    let weekday = &table.series[0];
    assert!(approx(weekday.values[0].unwrap(), 0.85));
    assert!(approx(weekday.values[1].unwrap(), 0.9));
    assert!(approx(weekday.values[2].unwrap(), 0.55));

    let saturday = &table.series[1];
    assert_eq!(saturday.values, vec![Some(0.2), None, None]);
}

#[test]
fn test_route_time_series_requires_selection() {
    let data = fixtures();
    assert_eq!(
        RouteSelection::new(Vec::new()),
        Err(Error::SelectionOutOfRange { selected: 0 })
    );

    let selection = RouteSelection::new(vec!["A".into(), "D".into()]).unwrap();
    let table = time_series(&data.otp, Perspective::Routes, selection.routes());
    assert_eq!(table.series.len(), 2);
    assert_eq!(table.series[0].values, vec![Some(0.9), Some(0.9), None]);
    assert_eq!(table.series[1].values, vec![None, None, Some(0.5)]);
}

#[test]
fn test_route_snapshot() {
    let data = fixtures();
    let snapshot = RouteSnapshot::compute(&data.otp, "A").unwrap();

    // valid rows: 0.9, 0.9, 0.8, 0.2, 0.5, 0.6 -> 0.65
    assert!(approx(snapshot.global_mean, 0.65));
    assert_eq!(snapshot.route_mean, 0.9);
    assert_eq!(snapshot.delta_percent, 38);

    assert_eq!(
        RouteSnapshot::compute(&data.otp, "C"),
        Err(Error::NoRecordsForRoute("C".to_string()))
    );
}

#[tokio::test]
async fn test_load_datasets_from_local_files() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    let config = DashboardConfig {
        otp_source: format!("{dir}/otp.csv"),
        stops_source: format!("{dir}/stops.csv"),
        ..DashboardConfig::default()
    };

    let client = BasicClient::new().unwrap();
    let data = Datasets::load(&client, &config).await.unwrap();
    assert_eq!(data.otp.len(), 8);
    assert_eq!(data.stops.len(), 5);
}
