//! Sound cues
//!
//! Playback lives in the host; this module only describes each cue so every
//! host renders the same tones.

use serde::{Deserialize, Serialize};

/// Sound effect triggered by a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// Falling sweep when the spin button is pressed
    SpinStart,
    /// Short tick as a segment passes the pointer
    Click,
    /// Rising C-E-G arpeggio on a win
    Win,
}

/// One oscillator note of a cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneNote {
    /// Offset from cue start (seconds)
    pub offset_s: f64,
    /// Start frequency (Hz)
    pub freq_hz: f64,
    /// Frequency at the end of the note; equal to `freq_hz` for a steady tone
    pub end_freq_hz: f64,
    /// Note length (seconds)
    pub duration_s: f64,
    /// Initial gain, decays exponentially to 0.01
    pub gain: f64,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::SpinStart => "spin_start",
            SoundCue::Click => "click",
            SoundCue::Win => "win",
        }
    }

    /// Oscillator recipe for this cue
    pub fn notes(&self) -> Vec<ToneNote> {
        match self {
            SoundCue::SpinStart => vec![ToneNote {
                offset_s: 0.0,
                freq_hz: 400.0,
                end_freq_hz: 200.0,
                duration_s: 0.2,
                gain: 0.3,
            }],
            SoundCue::Click => vec![ToneNote {
                offset_s: 0.0,
                freq_hz: 800.0,
                end_freq_hz: 800.0,
                duration_s: 0.05,
                gain: 0.1,
            }],
            SoundCue::Win => [523.25, 659.25, 783.99]
                .iter()
                .enumerate()
                .map(|(i, &freq)| ToneNote {
                    offset_s: i as f64 * 0.1,
                    freq_hz: freq,
                    end_freq_hz: freq,
                    duration_s: 0.3,
                    gain: 0.2,
                })
                .collect(),
        }
    }

    /// Time from cue start until the last note ends (seconds)
    pub fn total_duration_s(&self) -> f64 {
        self.notes()
            .iter()
            .map(|n| n.offset_s + n.duration_s)
            .fold(0.0, f64::max)
    }
}
