//! Result types returned to the presentation layer

use serde::{Deserialize, Serialize};

use crate::core::GeoPosition;

/// A completed location attempt.
///
/// Ephemeral by design: recomputed in full on every `locate` call and never
/// cached across station or velocity changes. When `converged` is false the
/// position is the solver's last iterate and must not be presented as an
/// epicenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpicenterEstimate {
    pub position: GeoPosition,
    pub converged: bool,
}
