//! Timing profiles for the spin animation

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Mobile (30 fps frame clock)
    Mobile,
    /// Studio mode (short spin, no settle pause, for testing)
    Studio,
    /// Custom timing multiplier
    Custom,
}

/// Detailed timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Wall-clock budget of the eased rotation (ms)
    pub spin_duration_ms: f64,

    /// Pause between the wheel coming to rest and the completion callback (ms)
    pub settle_delay_ms: f64,

    /// Pause between completion and showing the result screen (ms)
    pub result_reveal_delay_ms: f64,

    /// Frame period used by simulated clocks (ms)
    pub frame_interval_ms: f64,
}

const FRAME_60_FPS_MS: f64 = 1000.0 / 60.0;
const FRAME_30_FPS_MS: f64 = 1000.0 / 30.0;

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 3000.0,
            settle_delay_ms: 100.0,
            result_reveal_delay_ms: 500.0,
            frame_interval_ms: FRAME_60_FPS_MS,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 1500.0,
            settle_delay_ms: 50.0,
            result_reveal_delay_ms: 250.0,
            frame_interval_ms: FRAME_60_FPS_MS,
        }
    }

    /// Mobile optimized
    pub fn mobile() -> Self {
        Self {
            profile: TimingProfile::Mobile,
            spin_duration_ms: 3000.0,
            settle_delay_ms: 100.0,
            result_reveal_delay_ms: 500.0,
            frame_interval_ms: FRAME_30_FPS_MS,
        }
    }

    /// Studio mode
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            spin_duration_ms: 600.0,
            settle_delay_ms: 0.0,
            result_reveal_delay_ms: 0.0,
            frame_interval_ms: FRAME_60_FPS_MS,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Mobile => Self::mobile(),
            TimingProfile::Studio => Self::studio(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale durations by factor (< 1.0 = faster); frame rate is kept
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: self.spin_duration_ms * factor,
            settle_delay_ms: self.settle_delay_ms * factor,
            result_reveal_delay_ms: self.result_reveal_delay_ms * factor,
            frame_interval_ms: self.frame_interval_ms,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let studio = TimingConfig::studio();

        assert!(turbo.spin_duration_ms < normal.spin_duration_ms);
        assert!(studio.spin_duration_ms < turbo.spin_duration_ms);
        assert_eq!(studio.settle_delay_ms, 0.0);

        // Mobile only changes the frame clock
        let mobile = TimingConfig::mobile();
        assert_eq!(mobile.spin_duration_ms, normal.spin_duration_ms);
        assert!(mobile.frame_interval_ms > normal.frame_interval_ms);
    }

    #[test]
    fn test_scaled() {
        let half = TimingConfig::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.spin_duration_ms, 1500.0);
        assert_eq!(half.settle_delay_ms, 50.0);
        assert_eq!(half.frame_interval_ms, TimingConfig::normal().frame_interval_ms);
    }
}
