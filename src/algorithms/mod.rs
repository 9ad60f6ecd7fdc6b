//! Location algorithms: range derivation, projection, trilateration

pub mod projection;
pub mod travel_time;
pub mod trilateration;

pub use projection::PlanarFrame;
pub use travel_time::{hypocentral_range, TravelTimeModel};
pub use trilateration::{EpicenterSolver, PlanarFix};
