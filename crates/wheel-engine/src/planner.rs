//! Selection & trajectory planning
//!
//! Picks the winning segment and the absolute rotation that brings its
//! center under the pointer after a number of decorative full turns.

use rand::Rng;
use serde::{Deserialize, Serialize};
use wheel_core::{WheelError, WheelResult};

use crate::config::SpinConfig;
use crate::geometry::{
    FULL_TURN_DEG, normalize_degrees_360, normalize_signed_180, resting_angle_for, segment_angle,
};

/// One spin's trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub segment_count: usize,
    /// Winner drawn before the animation starts
    pub winning_index: usize,
    pub start_rotation: f64,
    pub target_rotation: f64,
    /// `target_rotation - start_rotation`, always positive
    pub total_delta: f64,
    /// Decorative full turns
    pub extra_spins: u32,
}

impl SpinPlan {
    pub fn segment_angle(&self) -> f64 {
        segment_angle(self.segment_count)
    }

    /// Target rotation in [0, 360)
    pub fn resting_angle(&self) -> f64 {
        normalize_degrees_360(self.target_rotation)
    }

    /// Final turn after the full turns, in (-180, 180]
    pub fn alignment_angle(&self) -> f64 {
        self.total_delta - self.extra_spins as f64 * FULL_TURN_DEG
    }
}

/// Build the plan for a known winner
///
/// The alignment turn is measured from the current orientation and wrapped to
/// (-180, 180], so the wheel always adds at least `extra_spins` turns minus half
/// a turn and never runs backwards.
pub fn plan_for_index(
    current_rotation: f64,
    segment_count: usize,
    winning_index: usize,
    extra_spins: u32,
) -> WheelResult<SpinPlan> {
    if segment_count == 0 {
        return Err(WheelError::EmptyWheel);
    }
    if winning_index >= segment_count {
        return Err(WheelError::IndexOutOfRange {
            index: winning_index,
            len: segment_count,
        });
    }

    let current_normalized = normalize_degrees_360(current_rotation);
    let full_rotations = extra_spins as f64 * FULL_TURN_DEG;
    let alignment = normalize_signed_180(
        resting_angle_for(winning_index, segment_count) - current_normalized,
    );
    let target_rotation = current_rotation + full_rotations + alignment;

    Ok(SpinPlan {
        segment_count,
        winning_index,
        start_rotation: current_rotation,
        target_rotation,
        total_delta: target_rotation - current_rotation,
        extra_spins,
    })
}

/// Draws winners and turn counts from an injected random source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinPlanner {
    min_spins: u32,
    max_spins: u32,
}

impl SpinPlanner {
    /// Turn counts are drawn from `[min_spins, max_spins)`
    pub fn new(min_spins: u32, max_spins: u32) -> WheelResult<Self> {
        if min_spins == 0 || min_spins >= max_spins {
            return Err(WheelError::InvalidConfig(format!(
                "invalid spin range [{}, {})",
                min_spins, max_spins
            )));
        }
        Ok(Self {
            min_spins,
            max_spins,
        })
    }

    pub fn from_config(config: &SpinConfig) -> WheelResult<Self> {
        Self::new(config.min_spins, config.max_spins)
    }

    pub fn min_spins(&self) -> u32 {
        self.min_spins
    }

    pub fn max_spins(&self) -> u32 {
        self.max_spins
    }

    /// Pick a uniform winner and a turn count, then plan the trajectory
    pub fn plan<R: Rng + ?Sized>(
        &self,
        current_rotation: f64,
        segment_count: usize,
        rng: &mut R,
    ) -> WheelResult<SpinPlan> {
        if segment_count == 0 {
            return Err(WheelError::EmptyWheel);
        }
        let winning_index = rng.random_range(0..segment_count);
        let extra_spins = rng.random_range(self.min_spins..self.max_spins);
        plan_for_index(current_rotation, segment_count, winning_index, extra_spins)
    }
}

impl Default for SpinPlanner {
    fn default() -> Self {
        Self {
            min_spins: 5,
            max_spins: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::segment_at_pointer;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_four_segment_scenario() {
        let plan = plan_for_index(10.0, 4, 2, 5).unwrap();

        assert_eq!(plan.segment_angle(), 90.0);
        assert_abs_diff_eq!(plan.resting_angle(), 135.0, epsilon = 1e-9);
        assert_eq!(segment_at_pointer(plan.target_rotation, 4), Some(2));
        assert_abs_diff_eq!(plan.alignment_angle(), 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_segment() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let planner = SpinPlanner::default();

        for _ in 0..50 {
            let plan = planner.plan(0.0, 1, &mut rng).unwrap();
            assert_eq!(plan.winning_index, 0);
            assert!(plan.total_delta >= 5.0 * 360.0 - 180.0);
            assert_eq!(segment_at_pointer(plan.target_rotation, 1), Some(0));
        }
    }

    #[test]
    fn test_empty_wheel_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = SpinPlanner::default().plan(0.0, 0, &mut rng).unwrap_err();
        assert!(matches!(err, WheelError::EmptyWheel));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = plan_for_index(0.0, 3, 3, 5).unwrap_err();
        assert!(matches!(err, WheelError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_invalid_planner_range() {
        assert!(SpinPlanner::new(0, 3).is_err());
        assert!(SpinPlanner::new(4, 4).is_err());
        assert!(SpinPlanner::new(1, 2).is_ok());
    }

    #[test]
    fn test_plan_properties_across_seeds() {
        let planner = SpinPlanner::default();

        for seed in 0..40u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for segment_count in 1..=24usize {
                let current = rng.random_range(-5000.0..250_000.0);
                let plan = planner.plan(current, segment_count, &mut rng).unwrap();

                assert!(plan.winning_index < segment_count);
                assert!((5..8).contains(&plan.extra_spins));
                assert!(plan.target_rotation > plan.start_rotation);
                assert!(plan.total_delta >= 5.0 * 360.0 - 180.0);
                assert_eq!(
                    segment_at_pointer(plan.target_rotation, segment_count),
                    Some(plan.winning_index)
                );

                // Resting angle puts the winner's center under the pointer
                let expected = resting_angle_for(plan.winning_index, segment_count);
                let diff = normalize_signed_180(plan.resting_angle() - expected);
                assert_abs_diff_eq!(diff, 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_seeded_plans_reproducible() {
        let planner = SpinPlanner::default();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        let plan_a = planner.plan(42.0, 12, &mut a).unwrap();
        let plan_b = planner.plan(42.0, 12, &mut b).unwrap();
        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn test_uniform_winner_distribution() {
        let planner = SpinPlanner::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut hits = [0u32; 6];

        for _ in 0..60_000 {
            let plan = planner.plan(0.0, 6, &mut rng).unwrap();
            hits[plan.winning_index] += 1;
        }

        for count in hits {
            assert!((8_500..=11_500).contains(&count), "skewed bucket: {}", count);
        }
    }
}
