//! Stage: The semantic moments of one wheel spin
//!
//! A Stage is NOT an animation frame. It is the meaning of a moment in the
//! spin flow, which sound and UI layers react to.

use serde::{Deserialize, Serialize};

use crate::cue::SoundCue;

/// Canonical wheel stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    /// Spin accepted, wheel starts turning
    SpinStart,

    /// Pointer crossed into another segment
    SegmentPass {
        /// Segment now under the pointer
        segment_index: usize,
    },

    /// Final frame drawn, wheel at rest
    SpinSettle {
        /// Segment recovered from the resting angle
        segment_index: usize,
    },

    /// Completion callback delivered
    SpinComplete {
        /// Verified winning segment
        segment_index: usize,
    },

    /// Result screen shown to the player
    ResultReveal,
}

impl Stage {
    /// Get a simple string name for this stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart => "spin_start",
            Stage::SegmentPass { .. } => "segment_pass",
            Stage::SpinSettle { .. } => "spin_settle",
            Stage::SpinComplete { .. } => "spin_complete",
            Stage::ResultReveal => "result_reveal",
        }
    }

    /// Segment carried by this stage, if any
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Stage::SegmentPass { segment_index }
            | Stage::SpinSettle { segment_index }
            | Stage::SpinComplete { segment_index } => Some(*segment_index),
            Stage::SpinStart | Stage::ResultReveal => None,
        }
    }

    /// Sound effect the UI plays for this stage
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            Stage::SpinStart => Some(SoundCue::SpinStart),
            Stage::SegmentPass { .. } => Some(SoundCue::Click),
            Stage::SpinComplete { .. } => Some(SoundCue::Win),
            Stage::SpinSettle { .. } | Stage::ResultReveal => None,
        }
    }

    /// Stages that close a spin
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::SpinComplete { .. } | Stage::ResultReveal)
    }
}
