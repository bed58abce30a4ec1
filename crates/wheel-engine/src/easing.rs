//! Easing curves for the spin animation

use serde::{Deserialize, Serialize};

/// Maps linear progress in [0, 1] to eased progress in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Fast start, long deceleration: `1 - (1 - t)^3`
    #[default]
    EaseOutCubic,
    /// Stronger deceleration tail: `1 - (1 - t)^4`
    EaseOutQuart,
}

impl Easing {
    /// Apply the curve; input is clamped to [0, 1]
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}
