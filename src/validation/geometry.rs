//! Station layout quality assessment
//!
//! A thin triangle of stations conditions the trilateration problem badly in
//! the direction normal to the line. The assessment here is diagnostic only:
//! callers log it and still attempt the solve, since the solver itself
//! reports degradation through its convergence flag.

use crate::core::PlanarPoint;

/// Stations closer together than this are treated as a single point (km)
const COINCIDENT_EPS_KM: f64 = 1e-6;

/// Below this area-to-span ratio the triangle is considered degenerate
const COLLINEARITY_RATIO: f64 = 0.02;

/// Graded quality of a three-station layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryQuality {
    /// Stations form a healthy triangle
    WellSpread,
    /// Stations are nearly on a common line
    NearlyCollinear,
    /// All stations occupy effectively the same point
    Coincident,
}

/// Assess the layout of three planar station positions.
pub fn assess_geometry(sites: &[PlanarPoint; 3]) -> GeometryQuality {
    let ab = sites[0].distance_to(&sites[1]);
    let bc = sites[1].distance_to(&sites[2]);
    let ca = sites[2].distance_to(&sites[0]);
    let longest = ab.max(bc).max(ca);

    if longest < COINCIDENT_EPS_KM {
        return GeometryQuality::Coincident;
    }

    // twice the triangle area, via the shoelace formula
    let doubled_area = (sites[0].x_km * (sites[1].y_km - sites[2].y_km)
        + sites[1].x_km * (sites[2].y_km - sites[0].y_km)
        + sites[2].x_km * (sites[0].y_km - sites[1].y_km))
        .abs();

    if doubled_area / (longest * longest) < COLLINEARITY_RATIO {
        GeometryQuality::NearlyCollinear
    } else {
        GeometryQuality::WellSpread
    }
}
