use serde::{Deserialize, Serialize};
use std::fmt;

/// A story location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err("Latitude and longitude must be finite numbers".to_string());
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude {lat} is out of range [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("Longitude {lon} is out of range [-180, 180]"));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}
