//! Renderer-facing wheel state

use serde::{Deserialize, Serialize};

use crate::geometry::normalize_degrees_360;

/// What the renderer reads each frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelState {
    /// Absolute rotation, continuous across spins
    pub rotation_degrees: f64,
    pub is_spinning: bool,
    /// Highlighted segment; optimistic while spinning, verified once settled
    pub selected_index: Option<usize>,
}

impl WheelState {
    pub fn normalized_rotation(&self) -> f64 {
        normalize_degrees_360(self.rotation_degrees)
    }
}

/// Timing of the spin in flight
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationFrameContext {
    /// Clock time of the first frame
    pub start_timestamp: Option<f64>,
    pub elapsed: f64,
}

impl AnimationFrameContext {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
