//! Input validation and diagnostics

pub mod error;
pub mod geometry;

pub use error::LocationError;
pub use geometry::{assess_geometry, GeometryQuality};
