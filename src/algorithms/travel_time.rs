//! PS-interval to hypocentral range conversion
//!
//! Under a constant-velocity model, a P wave and an S wave leaving the
//! hypocenter together arrive `d/vp` and `d/vs` seconds later. The observed
//! arrival-time differential therefore scales linearly with distance:
//!
//! `d = ps_interval * (vp * vs) / (vp - vs)`

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_P_VELOCITY_KMS, DEFAULT_S_VELOCITY_KMS};
use crate::validation::error::LocationError;

/// Constant-velocity travel-time model for the two body-wave phases.
///
/// Velocities are validated at construction, so a live model can always
/// produce a finite conversion factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeModel {
    p_velocity_kms: f64,
    s_velocity_kms: f64,
}

impl Default for TravelTimeModel {
    fn default() -> Self {
        Self {
            p_velocity_kms: DEFAULT_P_VELOCITY_KMS,
            s_velocity_kms: DEFAULT_S_VELOCITY_KMS,
        }
    }
}

impl TravelTimeModel {
    /// Build a model from the two wave velocities.
    ///
    /// Equal velocities leave the conversion factor undefined and are
    /// rejected. Other malformed pairs (negative, or S faster than P) are
    /// accepted here and screened at the session boundary instead.
    pub fn new(p_velocity_kms: f64, s_velocity_kms: f64) -> Result<Self, LocationError> {
        if p_velocity_kms == s_velocity_kms {
            return Err(LocationError::DegenerateModel {
                p_velocity_kms,
                s_velocity_kms,
            });
        }
        Ok(Self {
            p_velocity_kms,
            s_velocity_kms,
        })
    }

    pub fn p_velocity_kms(&self) -> f64 {
        self.p_velocity_kms
    }

    pub fn s_velocity_kms(&self) -> f64 {
        self.s_velocity_kms
    }

    /// Kilometers of hypocentral distance per second of PS interval
    pub fn conversion_factor(&self) -> f64 {
        (self.p_velocity_kms * self.s_velocity_kms)
            / (self.p_velocity_kms - self.s_velocity_kms)
    }

    /// Derive the range for one PS interval reading.
    ///
    /// The interval is taken verbatim. Zero maps to zero range and a
    /// negative reading (malformed operator input) maps to a negative
    /// range; downstream consumers treat both as ordinary targets.
    pub fn range_from_interval(&self, ps_interval_s: f64) -> f64 {
        ps_interval_s * self.conversion_factor()
    }
}

/// One-shot form of the range conversion for callers that do not hold a
/// model value.
pub fn hypocentral_range(
    ps_interval_s: f64,
    p_velocity_kms: f64,
    s_velocity_kms: f64,
) -> Result<f64, LocationError> {
    let model = TravelTimeModel::new(p_velocity_kms, s_velocity_kms)?;
    Ok(model.range_from_interval(ps_interval_s))
}
