//! Earthquake Epicenter Location
//!
//! Estimates the surface location of an earthquake from the PS intervals
//! (S-minus-P arrival time differentials) read at three observation
//! stations. Each interval converts to a hypocentral range through a
//! constant-velocity travel-time model; station coordinates project into a
//! locally flat kilometer frame; a damped least-squares iteration then
//! finds the point whose distances best match the three ranges, since
//! noisy ranges rarely let the three circles meet exactly.

pub mod algorithms;
pub mod api;
pub mod core;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use algorithms::projection::PlanarFrame;
pub use algorithms::travel_time::{hypocentral_range, TravelTimeModel};
pub use algorithms::trilateration::{EpicenterSolver, PlanarFix};
pub use api::{EpicenterEstimate, SurveySession};
pub use self::core::{GeoPosition, PlanarPoint, RangeCircle, Station};
pub use utils::config::{ConfigError, FrameConfig, SolverConfig, SurveyConfig};
pub use validation::error::LocationError;
pub use validation::geometry::{assess_geometry, GeometryQuality};
