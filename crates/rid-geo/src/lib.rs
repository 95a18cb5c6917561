use serde::{Deserialize, Serialize};
use std::fmt;

mod edge;
mod geodesy;

pub use edge::ray_hits_edge;
pub use geodesy::{
    EARTH_RADIUS_KM, bearing_degrees, destination_point, distance_to_segment_km,
    haversine_distance_km,
};

/// A position in decimal degrees.
///
/// `(0, 0)` is reserved: it marks "no position" for the vehicle and separates polygons inside
/// a vertex buffer, so record tables must never contain a point with both components zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const ZERO: Coordinate = Coordinate {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Converts integer positions in 1e-7 degrees, the unit used on the wire.
    pub fn from_e7(latitude_e7: i32, longitude_e7: i32) -> Self {
        Self {
            latitude: latitude_e7 as f64 * 1.0e-7,
            longitude: longitude_e7 as f64 * 1.0e-7,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    pub fn distance_km(&self, other: Coordinate) -> f64 {
        haversine_distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub fn bearing_to(&self, other: Coordinate) -> f64 {
        bearing_degrees(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub fn project(&self, distance_km: f64, bearing_deg: f64) -> Coordinate {
        destination_point(self.latitude, self.longitude, distance_km, bearing_deg)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.7},{:.7}", self.latitude, self.longitude)
    }
}
