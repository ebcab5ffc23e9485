use serde::Serialize;
use std::collections::BTreeMap;

use crate::pipeline::stops::StopRoute;
use crate::pipeline::utility::mean;

/// Mean route OTP at one physical stop; a row of the map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopOtp {
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub on_time_percent: f64,
}

/// Joins expanded stop rows to per-route OTP and averages per stop.
///
/// Pairs whose route has no OTP value are dropped; a stop left with no
/// routes is absent from the result. Every route counts once regardless of
/// how many rows fed its OTP value. Output is ordered by stop name.
pub fn stop_otp(stop_routes: &[StopRoute], route_otp: &BTreeMap<String, f64>) -> Vec<StopOtp> {
    let mut by_stop: BTreeMap<&str, (f64, f64, Vec<f64>)> = BTreeMap::new();

    for pair in stop_routes {
        let Some(otp) = route_otp.get(&pair.route) else {
            continue;
        };
        by_stop
            .entry(pair.stop_name.as_str())
            .or_insert_with(|| (pair.latitude, pair.longitude, Vec::new()))
            .2
            .push(*otp);
    }

    by_stop
        .into_iter()
        .filter_map(|(name, (latitude, longitude, values))| {
            mean(&values).map(|on_time_percent| StopOtp {
                stop_name: name.to_string(),
                latitude,
                longitude,
                on_time_percent,
            })
        })
        .collect()
}
