//! Weather time-series input types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the weather series at the hub measurement height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Rain mass flux (kg/m²/h)
    pub rain_flux: f64,
    /// Measured air density (kg/m³); `None` falls back to the configured reference density
    #[serde(default)]
    pub air_density: Option<f64>,
}

impl WeatherSample {
    pub fn new(timestamp: DateTime<Utc>, wind_speed: f64, rain_flux: f64) -> Self {
        Self {
            timestamp,
            wind_speed,
            rain_flux,
            air_density: None,
        }
    }

    pub fn with_air_density(mut self, air_density: f64) -> Self {
        self.air_density = Some(air_density);
        self
    }

    /// Whether rain at this sample exceeds the capping threshold.
    ///
    /// The comparison is strict: a threshold of 0 means "any rain at all".
    pub fn is_raining(&self, rain_threshold: f64) -> bool {
        self.rain_flux > rain_threshold
    }
}
