//! OTP aggregation pipeline.
//!
//! The geographic view runs filter → weighting → stop expansion → join. The
//! time view and the route snapshot read the OTP table on their own. Every
//! function here is pure and recomputed from the source tables per request.

pub mod filter;
pub mod join;
pub mod snapshot;
pub mod stops;
pub mod timeseries;
pub mod utility;
pub mod weighting;

use serde::Serialize;
use tracing::debug;

use crate::model::{GarageLocation, OtpRecord, StopRecord};
use filter::{FilterSpec, filter_records};
use join::{StopOtp, stop_otp};
use stops::expand_stops;
use weighting::route_otp;

/// Mean weighted OTP per physical stop for the rows selected by `spec`.
pub fn stop_otp_table(otp: &[OtpRecord], stops: &[StopRecord], spec: &FilterSpec) -> Vec<StopOtp> {
    let filtered = filter_records(otp, spec);
    let routes = route_otp(&filtered);
    let stop_routes = expand_stops(stops);
    let table = stop_otp(&stop_routes, &routes);

    debug!(
        filtered_rows = filtered.len(),
        routes = routes.len(),
        stop_routes = stop_routes.len(),
        stops = table.len(),
        "Computed stop OTP table"
    );
    table
}

/// Everything the map view draws: the stop layer and the garage markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoView {
    pub stops: Vec<StopOtp>,
    pub garages: Vec<GarageLocation>,
}

impl GeoView {
    pub fn compute(
        otp: &[OtpRecord],
        stops: &[StopRecord],
        spec: &FilterSpec,
        garages: &[GarageLocation],
    ) -> Self {
        Self {
            stops: stop_otp_table(otp, stops, spec),
            garages: garages.to_vec(),
        }
    }
}
