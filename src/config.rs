use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::GarageLocation;

pub const DEFAULT_OTP_SOURCE: &str =
    "https://data.wprdc.org/datastore/dump/00eb9600-69b5-4f11-b20a-8c8ddd8cfe7a";
pub const DEFAULT_STOPS_SOURCE: &str = "https://data.wprdc.org/dataset/ece64ad3-05eb-46dd-ba38-c83b5373812f/resource/3f40b94b-4ac4-48f1-8c61-8439d2d2f420/download/wprdc_stop_data.csv";

/// Dashboard settings, stored as a JSON object on disk:
/// ```json
/// {
///   "otp_source": "data/otp.csv",
///   "stops_source": "https://example.org/stops.csv",
///   "garages": ["Ross", "Collier"]
/// }
/// ```
/// Keys left out fall back to [`DashboardConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL or local path of the route-level OTP dataset.
    pub otp_source: String,
    /// URL or local path of the stop-location dataset.
    pub stops_source: String,
    /// Garages offered by the filter; an empty garage selection expands to this list.
    pub garages: Vec<String>,
    pub garage_locations: Vec<GarageLocation>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let location = |garage: &str, latitude, longitude| GarageLocation {
            garage: garage.to_string(),
            latitude,
            longitude,
        };

        Self {
            otp_source: DEFAULT_OTP_SOURCE.to_string(),
            stops_source: DEFAULT_STOPS_SOURCE.to_string(),
            garages: ["Ross", "Collier", "East Liberty", "East Liberty/West Mifflin"]
                .into_iter()
                .map(String::from)
                .collect(),
            garage_locations: vec![
                location("Ross", 40.500564, -80.021977),
                location("East Liberty", 40.457482, -79.914569),
                location("Collier", 40.367203, -80.101355),
                location("West Mifflin", 40.362506, -79.931848),
            ],
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {path}"))?;
        Ok(config)
    }

    /// Applies `OTP_SOURCE` / `STOPS_SOURCE` from the environment when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(source) = std::env::var("OTP_SOURCE") {
            self.otp_source = source;
        }
        if let Ok(source) = std::env::var("STOPS_SOURCE") {
            self.stops_source = source;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_default_has_four_garages() {
        let config = DashboardConfig::default();
        assert_eq!(config.garages.len(), 4);
        assert_eq!(config.garage_locations.len(), 4);
        assert_eq!(config.otp_source, DEFAULT_OTP_SOURCE);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = format!("{}/otp_dashboard_config_test.json", env::temp_dir().display());
        fs::write(&path, r#"{ "otp_source": "data/otp.csv", "garages": ["Ross"] }"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.otp_source, "data/otp.csv");
        assert_eq!(config.stops_source, DEFAULT_STOPS_SOURCE);
        assert_eq!(config.garages, vec!["Ross".to_string()]);
        assert_eq!(config.garage_locations.len(), 4);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(DashboardConfig::load("/nonexistent/otp_dashboard.json").is_err());
    }
}
