//! Tuning state snapshot.

use crate::modes::{Accessibility, Background, Negative, Outdoor, Scenario};

/// The mDNIe configuration record.
///
/// Use [`MdnieController::state`](crate::MdnieController::state) to obtain a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TuningState {
    /// Whether the engine accepts mode changes.
    pub enabled: bool,
    /// The selected content scenario.
    pub scenario: Scenario,
    /// The selected background style.
    pub background: Background,
    /// Outdoor enhancement.
    pub outdoor: Outdoor,
    /// Negative (inverted) mode.
    pub negative: Negative,
    /// Color-blind correction.
    pub accessibility: Accessibility,
}
