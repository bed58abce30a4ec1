//! StageEvent: A stage occurrence with metadata
//!
//! Wraps a Stage with timing and payload information.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Timestamp in milliseconds on the host's frame clock
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,
}

impl StageEvent {
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
        }
    }

    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
        }
    }

    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.payload.rotation_deg = Some(rotation_deg);
        self
    }

    pub fn with_segment_count(mut self, segment_count: usize) -> Self {
        self.payload.segment_count = Some(segment_count);
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.payload.category_id = Some(category_id.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Wheel rotation when the event fired (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,

    /// Segments on the wheel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_count: Option<usize>,

    /// Boundaries crossed since the previous frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_passed: Option<u32>,

    /// Category identity resolved from the segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}
