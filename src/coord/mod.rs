//! Geographic coordinates
//!
//! A `Coordinates` value is one user-selected point: either a map click or a
//! manually typed latitude/longitude pair. Values are plain decimal degrees.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create coordinates, rejecting NaN and infinite components
    pub fn finite(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() {
            return Err(Error::InvalidInput(format!("latitude {} is not a finite number", lat)));
        }
        if !lng.is_finite() {
            return Err(Error::InvalidInput(format!("longitude {} is not a finite number", lng)));
        }
        Ok(Self { lat, lng })
    }

    /// Parse coordinates from manual-entry text fields
    ///
    /// Surrounding whitespace is ignored. Either field failing to parse as a
    /// finite number yields `Error::InvalidInput`. Parsing is strict: a numeric
    /// prefix followed by other text (`"12abc"`) is rejected, not read as 12.
    pub fn from_text(lat: &str, lng: &str) -> Result<Self> {
        let lat = parse_degrees("latitude", lat)?;
        let lng = parse_degrees("longitude", lng)?;
        Self::finite(lat, lng)
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

fn parse_degrees(field: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    trimmed.parse::<f64>().map_err(|_| {
        Error::InvalidInput(format!("{} '{}' is not a number", field, trimmed))
    })
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = Error;

    /// Parse "lat,lng" as typed on the command line
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s.split_once(',').ok_or_else(|| {
            Error::InvalidInput(format!("expected LAT,LNG but got '{}'", s))
        })?;
        Self::from_text(lat, lng)
    }
}
