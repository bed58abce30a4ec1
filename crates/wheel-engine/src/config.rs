//! Spin engine configuration

use serde::{Deserialize, Serialize};
use wheel_core::{WheelError, WheelResult};

use crate::easing::Easing;
use crate::timing::{TimingConfig, TimingProfile};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Fewest decorative full turns per spin (inclusive)
    pub min_spins: u32,

    /// Most decorative full turns per spin (exclusive)
    pub max_spins: u32,

    /// Curve applied to animation progress
    #[serde(default)]
    pub easing: Easing,

    /// Durations and frame clock
    #[serde(default)]
    pub timing: TimingConfig,
}

impl SpinConfig {
    /// Default wheel feel: 5–7 extra turns over three seconds
    pub fn standard() -> Self {
        Self {
            min_spins: 5,
            max_spins: 8,
            easing: Easing::EaseOutCubic,
            timing: TimingConfig::normal(),
        }
    }

    /// Same turn range with a different timing profile
    pub fn with_profile(profile: TimingProfile) -> Self {
        Self {
            timing: TimingConfig::from_profile(profile),
            ..Self::standard()
        }
    }

    pub fn validate(&self) -> WheelResult<()> {
        if self.min_spins == 0 {
            return Err(WheelError::InvalidConfig("min_spins must be at least 1".into()));
        }
        if self.min_spins >= self.max_spins {
            return Err(WheelError::InvalidConfig(format!(
                "spin range [{}, {}) is empty",
                self.min_spins, self.max_spins
            )));
        }
        let timing = &self.timing;
        if !(timing.spin_duration_ms.is_finite() && timing.spin_duration_ms > 0.0) {
            return Err(WheelError::InvalidConfig(format!(
                "spin_duration_ms must be positive, got {}",
                timing.spin_duration_ms
            )));
        }
        if !(timing.settle_delay_ms.is_finite() && timing.settle_delay_ms >= 0.0) {
            return Err(WheelError::InvalidConfig(format!(
                "settle_delay_ms must be non-negative, got {}",
                timing.settle_delay_ms
            )));
        }
        if !(timing.frame_interval_ms.is_finite() && timing.frame_interval_ms > 0.0) {
            return Err(WheelError::InvalidConfig(format!(
                "frame_interval_ms must be positive, got {}",
                timing.frame_interval_ms
            )));
        }
        Ok(())
    }

    /// Export config as JSON
    pub fn export_json(&self) -> WheelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import and validate config from JSON
    pub fn from_json(json: &str) -> WheelResult<Self> {
        let config: SpinConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::standard()
    }
}
