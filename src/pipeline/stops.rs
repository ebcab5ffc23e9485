//! Expansion of the stop table into one row per (stop, route) pair.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::model::StopRecord;

pub const ROUTE_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRoute {
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub route: String,
}

/// Splits a delimited route list into distinct, trimmed route identifiers in
/// their original order.
pub fn split_routes(routes_ser: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    routes_ser
        .split(ROUTE_DELIMITER)
        .map(str::trim)
        .filter(|r| !r.is_empty() && seen.insert(*r))
        .map(String::from)
        .collect()
}

/// De-duplicates stops by name (first occurrence wins) and emits one row per
/// served route.
///
/// Stops lacking a name, coordinates or any route token produce no rows.
pub fn expand_stops(stops: &[StopRecord]) -> Vec<StopRoute> {
    let mut seen_names = HashSet::new();
    let mut expanded = Vec::new();
    let mut dropped = 0usize;

    for stop in stops {
        let Some(name) = stop.stop_name.as_deref() else {
            dropped += 1;
            continue;
        };
        if !seen_names.insert(name) {
            continue;
        }
        let (Some(latitude), Some(longitude)) = (stop.latitude, stop.longitude) else {
            dropped += 1;
            continue;
        };

        let routes = stop.routes_ser.as_deref().map(split_routes).unwrap_or_default();
        if routes.is_empty() {
            dropped += 1;
        }

        expanded.extend(routes.into_iter().map(|route| StopRoute {
            stop_name: name.to_string(),
            latitude,
            longitude,
            route,
        }));
    }

    debug!(
        stops = stops.len(),
        unique = seen_names.len(),
        dropped,
        rows = expanded.len(),
        "Expanded stop table"
    );
    expanded
}
