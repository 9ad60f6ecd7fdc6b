//! Geographic to local planar projection
//!
//! The frame applies one fixed kilometer-per-degree scale to each axis and
//! nothing else: no rotation, no latitude-dependent shrink of the longitude
//! scale. That keeps the forward and inverse maps exact inverses of each
//! other and makes Euclidean distances in the frame meaningful over station
//! separations of a few hundred kilometers around the reference latitude.
//! It is a known accuracy boundary, not a general geodesic projection.

use serde::{Deserialize, Serialize};

use crate::core::{GeoPosition, PlanarPoint, KM_PER_DEGREE_LAT, KM_PER_DEGREE_LON};

/// Fixed linear scaling between degrees and local kilometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarFrame {
    pub km_per_degree_lon: f64,
    pub km_per_degree_lat: f64,
}

impl Default for PlanarFrame {
    fn default() -> Self {
        Self {
            km_per_degree_lon: KM_PER_DEGREE_LON,
            km_per_degree_lat: KM_PER_DEGREE_LAT,
        }
    }
}

impl PlanarFrame {
    pub fn new(km_per_degree_lon: f64, km_per_degree_lat: f64) -> Self {
        Self {
            km_per_degree_lon,
            km_per_degree_lat,
        }
    }

    /// Project a geographic coordinate into the planar frame.
    pub fn to_planar(&self, position: GeoPosition) -> PlanarPoint {
        PlanarPoint {
            x_km: position.lon * self.km_per_degree_lon,
            y_km: position.lat * self.km_per_degree_lat,
        }
    }

    /// Map a planar point back to geographic coordinates. Exact inverse of
    /// `to_planar` up to floating-point rounding.
    pub fn to_geodetic(&self, point: PlanarPoint) -> GeoPosition {
        GeoPosition {
            lat: point.y_km / self.km_per_degree_lat,
            lon: point.x_km / self.km_per_degree_lon,
        }
    }
}
