//! StageTrace: The full sequence of stage events for one spin
//!
//! A trace captures the timeline of a spin so it can be checked or replayed
//! by a sound designer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;

/// A complete trace of stage events for one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Spin number within the session
    #[serde(default)]
    pub spin_id: Option<String>,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,

    /// Custom metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StageTrace {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            spin_id: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    pub fn with_spin(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.type_name() == type_name)
            .collect()
    }

    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.type_name() == type_name)
    }

    /// Number of pointer clicks heard during the spin
    pub fn click_count(&self) -> u32 {
        self.events_by_type("segment_pass")
            .iter()
            .map(|e| e.payload.segments_passed.unwrap_or(1))
            .sum()
    }

    /// Segment reported to the caller
    pub fn winning_index(&self) -> Option<usize> {
        self.events_by_type("spin_complete")
            .last()
            .and_then(|e| e.stage.segment_index())
    }

    /// Validate trace ordering and consistency
    pub fn validate(&self) -> TraceValidation {
        let settle = self
            .events_by_type("spin_settle")
            .last()
            .and_then(|e| e.stage.segment_index());

        TraceValidation {
            starts_with_spin_start: self
                .events
                .first()
                .is_some_and(|e| e.type_name() == "spin_start"),
            has_spin_settle: settle.is_some(),
            has_spin_complete: self.has_stage("spin_complete"),
            ends_with_terminal: self.events.last().is_some_and(|e| e.stage.is_terminal()),
            monotonic: self
                .events
                .windows(2)
                .all(|w| w[1].timestamp_ms >= w[0].timestamp_ms),
            settle_matches_complete: settle == self.winning_index(),
        }
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub starts_with_spin_start: bool,
    pub has_spin_settle: bool,
    pub has_spin_complete: bool,
    /// Last event closes the spin (complete or result reveal)
    pub ends_with_terminal: bool,
    pub monotonic: bool,
    pub settle_matches_complete: bool,
}

impl TraceValidation {
    pub fn is_valid(&self) -> bool {
        self.starts_with_spin_start
            && self.has_spin_settle
            && self.has_spin_complete
            && self.ends_with_terminal
            && self.monotonic
            && self.settle_matches_complete
    }

    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.starts_with_spin_start {
            warnings.push("Trace does not start with SPIN_START");
        }
        if !self.has_spin_settle {
            warnings.push("Missing SPIN_SETTLE event");
        }
        if !self.has_spin_complete {
            warnings.push("Missing SPIN_COMPLETE event");
        }
        if !self.ends_with_terminal {
            warnings.push("Trace continues after the spin closed");
        }
        if !self.monotonic {
            warnings.push("Timestamps go backwards");
        }
        if !self.settle_matches_complete {
            warnings.push("Settled segment differs from reported segment");
        }

        warnings
    }
}
