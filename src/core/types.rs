//! Core data types for epicenter location

use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

/// Local planar coordinate in kilometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x_km: f64,
    pub y_km: f64,
}

impl PlanarPoint {
    pub fn new(x_km: f64, y_km: f64) -> Self {
        Self { x_km, y_km }
    }

    /// Euclidean distance to another planar point (km)
    pub fn distance_to(&self, other: &PlanarPoint) -> f64 {
        let dx = self.x_km - other.x_km;
        let dy = self.y_km - other.y_km;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One observation station: a fixed position and the PS interval read there.
///
/// The hypocentral range is never stored on the station. It is derived from
/// the interval through a `TravelTimeModel` at the point of use, so a change
/// to either the interval or the velocities is reflected on the next read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub position: GeoPosition,
    /// S-minus-P arrival time differential (seconds)
    pub ps_interval_s: f64,
}

impl Station {
    pub fn new(position: GeoPosition, ps_interval_s: f64) -> Self {
        Self {
            position,
            ps_interval_s,
        }
    }
}

/// One trilateration constraint: a station's planar position together with
/// its target range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCircle {
    pub center: PlanarPoint,
    pub radius_km: f64,
}

impl RangeCircle {
    pub fn new(center: PlanarPoint, radius_km: f64) -> Self {
        Self { center, radius_km }
    }
}
