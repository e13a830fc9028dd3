//! Geographic coordinate value type.
//!
//! # Invariants
//! - Latitude is finite and within `[-90, 90]`.
//! - Longitude is finite and within `[-180, 180]`.
//! - Distances are planar Euclidean on raw degrees. Adequate inside one
//!   sales territory, not geodesic-correct at continental scale.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for coordinate construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    NonFinite { lat: f64, lng: f64 },
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl Display for CoordinateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { lat, lng } => {
                write!(f, "coordinate must be finite, got ({lat}, {lng})")
            }
            Self::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {lat} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(lng) => {
                write!(f, "longitude {lng} is outside [-180, 180]")
            }
        }
    }
}

impl Error for CoordinateError {}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(value.lat, value.lng)
    }
}

impl Coordinate {
    /// Creates a coordinate after range and finiteness checks.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Straight-line distance in degrees.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lng = self.lng - other.lng;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }

    /// `lat,lng` with six decimals (~0.1 m), the form map URIs expect.
    pub fn to_query_value(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lng)
    }
}
