//! Session-facing surface: the station list and the location pipeline

pub mod session;
pub mod types;

pub use session::SurveySession;
pub use types::EpicenterEstimate;
