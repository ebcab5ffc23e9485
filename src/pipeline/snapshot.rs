use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::OtpRecord;
use crate::pipeline::utility::mean;

/// One route's mean OTP compared against the system-wide mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSnapshot {
    pub route: String,
    pub route_mean: f64,
    pub global_mean: f64,
    /// `(route_mean - global_mean) / global_mean * 100`, rounded.
    pub delta_percent: i64,
}

impl RouteSnapshot {
    /// Computes the snapshot over the valid rows of `records`.
    ///
    /// # Errors
    ///
    /// [`Error::NoRecordsForRoute`] when `route` has no valid rows (which also
    /// covers an empty table), plus the errors of [`RouteSnapshot::from_means`].
    pub fn compute(records: &[OtpRecord], route: &str) -> Result<Self> {
        let global: Vec<f64> = records
            .iter()
            .filter(|r| r.is_valid())
            .filter_map(|r| r.on_time_percent)
            .collect();
        let for_route: Vec<f64> = records
            .iter()
            .filter(|r| r.is_valid() && r.route.as_deref() == Some(route))
            .filter_map(|r| r.on_time_percent)
            .collect();

        let route_mean =
            mean(&for_route).ok_or_else(|| Error::NoRecordsForRoute(route.to_string()))?;
        let global_mean = mean(&global).ok_or_else(|| Error::NoRecordsForRoute(route.to_string()))?;

        Self::from_means(route, route_mean, global_mean)
    }

    /// Builds a snapshot from precomputed means.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroGlobalMean`] or [`Error::NonFiniteGlobalMean`] when the
    /// global mean cannot divide, [`Error::NonFiniteDelta`] when the delta is
    /// NaN or infinite.
    pub fn from_means(route: &str, route_mean: f64, global_mean: f64) -> Result<Self> {
        if !global_mean.is_finite() {
            return Err(Error::NonFiniteGlobalMean(global_mean));
        }
        if global_mean == 0.0 {
            return Err(Error::ZeroGlobalMean);
        }
        let delta = (route_mean - global_mean) / global_mean * 100.0;
        if !delta.is_finite() {
            return Err(Error::NonFiniteDelta(route.to_string()));
        }

        Ok(Self {
            route: route.to_string(),
            route_mean,
            global_mean,
            delta_percent: delta.round() as i64,
        })
    }

    /// Route mean expressed in percentage points.
    pub fn route_percent(&self) -> f64 {
        self.route_mean * 100.0
    }
}
