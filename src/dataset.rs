//! The two immutable source tables, loaded once per process.

use anyhow::Result;
use tracing::info;

use crate::config::DashboardConfig;
use crate::fetch::{HttpClient, load_source};
use crate::model::{OtpRecord, StopRecord};
use crate::parser::{parse_otp, parse_stops};

#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub otp: Vec<OtpRecord>,
    pub stops: Vec<StopRecord>,
}

impl Datasets {
    /// Fetches and parses both datasets named by `config`.
    #[tracing::instrument(skip_all, fields(otp = %config.otp_source, stops = %config.stops_source))]
    pub async fn load<C: HttpClient>(client: &C, config: &DashboardConfig) -> Result<Self> {
        let otp_bytes = load_source(client, &config.otp_source).await?;
        let otp = parse_otp(&otp_bytes)?;

        let stop_bytes = load_source(client, &config.stops_source).await?;
        let stops = parse_stops(&stop_bytes)?;

        info!(otp_rows = otp.len(), stop_rows = stops.len(), "Datasets loaded");
        Ok(Self { otp, stops })
    }
}
