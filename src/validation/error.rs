//! Error classification for epicenter location

use std::fmt;

use crate::core::STATION_COUNT;

/// Errors raised by the location pipeline.
///
/// Solver non-convergence is deliberately absent here. A solve that runs out
/// of iterations or hits a singular step is an expected outcome of noisy or
/// degenerate geometry and is reported through the `converged` flag on the
/// result, never as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    /// P and S velocities are equal, so the range conversion factor is
    /// undefined
    DegenerateModel {
        p_velocity_kms: f64,
        s_velocity_kms: f64,
    },
    /// A solve was requested with the wrong number of stations
    StationCount { found: usize },
    /// The session already holds its maximum number of stations
    SessionFull { capacity: usize },
    /// A station at this exact latitude is already registered
    DuplicateStation { lat: f64 },
    /// Station index outside the current station list
    StationIndex { index: usize, len: usize },
    /// Velocity pair rejected at the session boundary: both must be positive
    /// and P must exceed S
    InvalidVelocities {
        p_velocity_kms: f64,
        s_velocity_kms: f64,
    },
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::DegenerateModel {
                p_velocity_kms,
                s_velocity_kms,
            } => write!(
                f,
                "degenerate travel-time model: P velocity {} km/s equals S velocity {} km/s",
                p_velocity_kms, s_velocity_kms
            ),
            LocationError::StationCount { found } => write!(
                f,
                "epicenter solve requires exactly {} stations, got {}",
                STATION_COUNT, found
            ),
            LocationError::SessionFull { capacity } => {
                write!(f, "station list is full ({} stations)", capacity)
            }
            LocationError::DuplicateStation { lat } => {
                write!(f, "a station at latitude {} is already registered", lat)
            }
            LocationError::StationIndex { index, len } => {
                write!(f, "station index {} out of range (len {})", index, len)
            }
            LocationError::InvalidVelocities {
                p_velocity_kms,
                s_velocity_kms,
            } => write!(
                f,
                "invalid velocities: P {} km/s and S {} km/s must both be positive with P > S",
                p_velocity_kms, s_velocity_kms
            ),
        }
    }
}

impl std::error::Error for LocationError {}
