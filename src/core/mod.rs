//! Core types and constants for epicenter location

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
